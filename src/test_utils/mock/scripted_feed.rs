use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures::stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tonic::async_trait;
use tonic::Status;

use crate::proto::materialize::WatchPermissionSetsResponse;
use crate::proto::v1::ZedToken;
use crate::HandleProvider;
use crate::NetworkError;
use crate::Result;
use crate::WatchHandle;
use crate::WatchStream;

/// What one subscription does
pub enum Script {
    /// Opening the subscription fails with this status
    Reject(Status),
    /// The stream yields these items, then the server closes it
    Stream(Vec<std::result::Result<WatchPermissionSetsResponse, Status>>),
}

/// Shared state behind every handle of a [`ScriptedProvider`].
///
/// Once the scripts are used up, subscriptions stay open without
/// delivering anything.
pub struct ScriptedFeed {
    scripts: Mutex<VecDeque<Script>>,
    subscriptions: mpsc::UnboundedSender<Option<ZedToken>>,
    acquired: AtomicUsize,
}

impl ScriptedFeed {
    /// Number of handles built so far
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct ScriptedHandle {
    feed: Arc<ScriptedFeed>,
}

pub struct ScriptedProvider {
    feed: Arc<ScriptedFeed>,
    fail_acquire: bool,
}

impl ScriptedProvider {
    /// Returns the provider, a receiver yielding the `starting_after` cursor
    /// of every subscription in call order, and the shared feed.
    pub fn new(
        scripts: Vec<Script>
    ) -> (
        Self,
        mpsc::UnboundedReceiver<Option<ZedToken>>,
        Arc<ScriptedFeed>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let feed = Arc::new(ScriptedFeed {
            scripts: Mutex::new(scripts.into()),
            subscriptions: tx,
            acquired: AtomicUsize::new(0),
        });
        (
            Self {
                feed: feed.clone(),
                fail_acquire: false,
            },
            rx,
            feed,
        )
    }

    /// Provider whose credentials can never be built
    pub fn failing() -> Self {
        let (mut provider, _rx, _feed) = Self::new(vec![]);
        provider.fail_acquire = true;
        provider
    }
}

impl HandleProvider for ScriptedProvider {
    type Handle = ScriptedHandle;

    fn acquire(&self) -> Result<Self::Handle> {
        if self.fail_acquire {
            return Err(NetworkError::Credentials("no trust material".into()).into());
        }
        self.feed.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedHandle {
            feed: self.feed.clone(),
        })
    }
}

#[async_trait]
impl WatchHandle for ScriptedHandle {
    async fn subscribe(
        &mut self,
        starting_after: Option<ZedToken>,
    ) -> Result<WatchStream> {
        let _ = self.feed.subscriptions.send(starting_after);
        let script = self.feed.scripts.lock().pop_front();
        match script {
            Some(Script::Reject(status)) => Err(status.into()),
            Some(Script::Stream(items)) => Ok(Box::pin(stream::iter(items))),
            None => Ok(Box::pin(stream::pending::<
                std::result::Result<WatchPermissionSetsResponse, Status>,
            >())),
        }
    }
}
