use parking_lot::Mutex;
use tracing::debug;

use crate::HandleProvider;
use crate::Result;

/// Owns the provider and the handle currently in use.
///
/// The watcher asks for the current handle before every subscription and
/// invalidates it after a stream failure, so the next subscription runs on a
/// freshly acquired handle.
pub struct HandleSlot<P: HandleProvider> {
    provider: P,
    current: Mutex<Option<P::Handle>>,
}

impl<P: HandleProvider> HandleSlot<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            current: Mutex::new(None),
        }
    }

    /// Returns the live handle, acquiring one when the slot is empty.
    pub fn current_or_acquire(&self) -> Result<P::Handle> {
        let mut current = self.current.lock();
        if let Some(handle) = current.as_ref() {
            return Ok(handle.clone());
        }

        debug!("acquiring new watch handle");
        let handle = self.provider.acquire()?;
        *current = Some(handle.clone());
        Ok(handle)
    }

    /// Drops the live handle; the next call to
    /// [`current_or_acquire`](Self::current_or_acquire) builds a new one.
    pub fn invalidate(&self) {
        if self.current.lock().take().is_some() {
            debug!("watch handle invalidated");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.current.lock().is_some()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
