use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;
use tracing::warn;

use crate::metrics;
use crate::spawn_watcher;
use crate::EdgeStore;
use crate::GrpcHandleProvider;
use crate::PermissionSetWatcher;
use crate::PermissionsClient;
use crate::Result;
use crate::Settings;
use crate::SledCursorStore;
use crate::SledEdgeStore;
use crate::SystemError;

/// A ready-to-run mirror: storage is open, the watcher is not started yet.
pub struct Mirror {
    settings: Settings,
    provider: GrpcHandleProvider,
    edge_store: Arc<SledEdgeStore>,
    cursor_store: Arc<SledCursorStore>,
    shutdown_signal: watch::Receiver<()>,
}

impl Mirror {
    pub(crate) fn new(
        settings: Settings,
        provider: GrpcHandleProvider,
        edge_store: Arc<SledEdgeStore>,
        cursor_store: Arc<SledCursorStore>,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            settings,
            provider,
            edge_store,
            cursor_store,
            shutdown_signal,
        }
    }

    /// Read access to the mirrored edges
    pub fn edge_store(&self) -> Arc<SledEdgeStore> {
        self.edge_store.clone()
    }

    /// Client for writing relationships with the mirror's credentials
    pub fn permissions_client(&self) -> Result<PermissionsClient> {
        self.provider.permissions_client()
    }

    /// Runs the watcher (and the metrics endpoint, when enabled) until the
    /// shutdown signal fires.
    ///
    /// # Errors
    /// Returns the watcher's fatal error, or `SystemError::TaskFailed` if
    /// the watcher task panicked.
    pub async fn run(self) -> Result<()> {
        if self.settings.monitoring.prometheus_enabled {
            tokio::spawn(metrics::start_server(
                self.settings.monitoring.prometheus_port,
                self.shutdown_signal.clone(),
            ));
        }

        let watcher = PermissionSetWatcher::new(
            self.provider,
            self.edge_store.clone(),
            self.cursor_store,
            &self.settings.retry.watch,
        );
        info!(
            endpoint = %self.settings.authzed.materialize_endpoint,
            "permission set mirror started"
        );
        let result = spawn_watcher(watcher, self.shutdown_signal)
            .await
            .map_err(SystemError::TaskFailed)?;

        match self.edge_store.flush() {
            Ok(bytes) => info!(bytes, "mirror storage flushed"),
            Err(e) => warn!("failed to flush mirror storage: {:?}", e),
        }
        result
    }
}
