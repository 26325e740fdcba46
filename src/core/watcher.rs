use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::metrics::COMPLETED_REVISIONS;
use crate::metrics::UNHANDLED_RESPONSES;
use crate::metrics::WATCH_RECONNECTS;
use crate::proto::materialize::watch_permission_sets_response::Response;
use crate::proto::materialize::WatchPermissionSetsResponse;
use crate::proto::v1::ZedToken;
use crate::utils::Backoff;
use crate::BackoffPolicy;
use crate::ChangeMaterializer;
use crate::CursorStore;
use crate::EdgeStore;
use crate::Error;
use crate::HandleProvider;
use crate::HandleSlot;
use crate::NetworkError;
use crate::Result;
use crate::WatchHandle;
use crate::WatchStream;

/// Keeps the mirror in step with the watch feed.
///
/// Runs `Disconnected -> Streaming -> Disconnected -> ...` until shutdown:
/// - Disconnected: take the live handle (acquiring one if needed) and open a
///   subscription after the resume cursor.
/// - Streaming: materialize changes in receive order; a completed revision
///   advances and persists the cursor.
/// - Any stream error or server close drops the handle, backs off and
///   reconnects.
///
/// Only a handle that can never be built, or an exhausted bounded retry
/// policy, ends the loop with an error.
pub struct PermissionSetWatcher<P, S, C>
where
    P: HandleProvider,
    S: EdgeStore,
    C: CursorStore,
{
    handles: HandleSlot<P>,
    materializer: ChangeMaterializer<S>,
    cursor_store: Arc<C>,
    resume_cursor: Option<ZedToken>,
    backoff: Backoff,
}

enum StreamEnd {
    Shutdown,
    Failed,
}

impl<P, S, C> PermissionSetWatcher<P, S, C>
where
    P: HandleProvider,
    S: EdgeStore,
    C: CursorStore,
{
    pub fn new(
        provider: P,
        edge_store: Arc<S>,
        cursor_store: Arc<C>,
        policy: &BackoffPolicy,
    ) -> Self {
        Self {
            handles: HandleSlot::new(provider),
            materializer: ChangeMaterializer::new(edge_store),
            cursor_store,
            resume_cursor: None,
            backoff: Backoff::new(policy),
        }
    }

    pub fn resume_cursor(&self) -> Option<&ZedToken> {
        self.resume_cursor.as_ref()
    }

    /// Runs until `shutdown` fires (`Ok`) or a fatal error occurs (`Err`).
    pub async fn run(
        mut self,
        mut shutdown: watch::Receiver<()>,
    ) -> Result<()> {
        self.restore_resume_cursor();

        loop {
            let mut handle = self.handles.current_or_acquire().map_err(|e| {
                error!("unable to build watch handle: {:?}", e);
                Error::Fatal(format!("unable to build watch handle: {e}"))
            })?;

            let starting_after = self.resume_cursor.clone();
            debug!(?starting_after, "opening watch subscription");
            let opened = tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    info!("shutdown signal received, watcher stopped");
                    return Ok(());
                }
                opened = handle.subscribe(starting_after) => opened,
            };

            match opened {
                Ok(stream) => {
                    info!(resume_cursor = ?self.resume_cursor, "watch subscription open");
                    if let StreamEnd::Shutdown = self.consume(stream, &mut shutdown).await {
                        info!("shutdown signal received, watcher stopped");
                        return Ok(());
                    }
                }
                Err(e) => {
                    warn!("failed to open watch subscription: {:?}", e);
                }
            }

            if !self.reconnect_delay(&mut shutdown).await? {
                info!("shutdown signal received during backoff, watcher stopped");
                return Ok(());
            }
        }
    }

    /// Receive loop of one subscription
    async fn consume(
        &mut self,
        mut stream: WatchStream,
        shutdown: &mut watch::Receiver<()>,
    ) -> StreamEnd {
        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown.changed() => return StreamEnd::Shutdown,
                next = stream.next() => next,
            };

            match next {
                Some(Ok(response)) => {
                    self.backoff.reset();
                    self.handle_response(response);
                }
                Some(Err(status)) => {
                    warn!("watch stream failed: {:?}", status);
                    return StreamEnd::Failed;
                }
                None => {
                    warn!("{}", NetworkError::StreamClosed);
                    return StreamEnd::Failed;
                }
            }
        }
    }

    /// Drops the handle and sleeps before the next attempt.
    ///
    /// Returns `false` when shutdown fired during the sleep.
    async fn reconnect_delay(
        &mut self,
        shutdown: &mut watch::Receiver<()>,
    ) -> Result<bool> {
        self.handles.invalidate();
        WATCH_RECONNECTS.inc();

        if self.backoff.exhausted() {
            error!(attempts = self.backoff.attempts(), "watch reconnect retries exhausted");
            return Err(Error::Fatal(format!(
                "watch feed unreachable after {} reconnect attempts",
                self.backoff.attempts()
            )));
        }

        let delay = self.backoff.next_delay();
        debug!(?delay, attempt = self.backoff.attempts(), "reconnecting watch feed");
        tokio::select! {
            biased;
            _ = shutdown.changed() => Ok(false),
            _ = sleep(delay) => Ok(true),
        }
    }

    pub(crate) fn handle_response(
        &mut self,
        response: WatchPermissionSetsResponse,
    ) {
        match response.response {
            Some(Response::Change(change)) => {
                debug!(?change, "change received");
                // Logged by the materializer; the feed moves on regardless.
                let _ = self.materializer.apply(&change);
            }
            Some(Response::CompletedRevision(token)) => {
                debug!(token = %token.token, "revision completed");
                COMPLETED_REVISIONS.inc();
                if let Err(e) = self.cursor_store.save_resume_cursor(&token.token) {
                    error!("failed to persist resume cursor: {:?}", e);
                }
                self.resume_cursor = Some(token);
            }
            Some(Response::LookupPermissionSetsRequired(required)) => {
                warn!(?required, "lookup of permission sets required; not supported, skipped");
                UNHANDLED_RESPONSES.with_label_values(&["lookup_permission_sets_required"]).inc();
            }
            Some(Response::BreakingSchemaChange(change)) => {
                warn!(?change, "breaking schema change reported; not supported, skipped");
                UNHANDLED_RESPONSES.with_label_values(&["breaking_schema_change"]).inc();
            }
            None => {
                warn!("watch response without payload, skipped");
                UNHANDLED_RESPONSES.with_label_values(&["empty"]).inc();
            }
        }
    }

    fn restore_resume_cursor(&mut self) {
        match self.cursor_store.load_resume_cursor() {
            Ok(Some(token)) => {
                info!(%token, "resuming watch feed after persisted revision");
                self.resume_cursor = Some(ZedToken { token });
            }
            Ok(None) => {
                info!("no persisted revision, watching from the beginning");
            }
            Err(e) => {
                error!("failed to load resume cursor, watching from the beginning: {:?}", e);
            }
        }
    }
}

/// Runs the watcher on its own task.
pub fn spawn_watcher<P, S, C>(
    watcher: PermissionSetWatcher<P, S, C>,
    shutdown: watch::Receiver<()>,
) -> JoinHandle<Result<()>>
where
    P: HandleProvider,
    S: EdgeStore,
    C: CursorStore,
{
    tokio::spawn(watcher.run(shutdown))
}
