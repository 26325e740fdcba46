//! Assembles a [`Mirror`] from [`Settings`].
//!
//! ## Example
//! ```ignore
//! let (shutdown_tx, shutdown_rx) = watch::channel(());
//! let mirror = MirrorBuilder::init(settings, shutdown_rx)
//!     .build()?;
//! mirror.run().await?;
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::init_sled_storage_db;
use crate::GrpcHandleProvider;
use crate::Mirror;
use crate::Result;
use crate::Settings;
use crate::SledCursorStore;
use crate::SledEdgeStore;
use crate::StorageError;

pub struct MirrorBuilder {
    settings: Settings,
    shutdown_signal: watch::Receiver<()>,
    db: Option<sled::Db>,
    provider: Option<GrpcHandleProvider>,
}

impl MirrorBuilder {
    pub fn init(
        settings: Settings,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            settings,
            shutdown_signal,
            db: None,
            provider: None,
        }
    }

    /// Uses an already opened database instead of `storage.db_root_dir`
    pub fn db(
        mut self,
        db: sled::Db,
    ) -> Self {
        self.db = Some(db);
        self
    }

    /// Overrides the handle provider built from the settings
    pub fn provider(
        mut self,
        provider: GrpcHandleProvider,
    ) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Opens storage and registers the edge and watch-state trees.
    pub fn build(self) -> Result<Mirror> {
        let db = match self.db {
            Some(db) => db,
            None => init_sled_storage_db(&self.settings.storage.db_root_dir)
                .map_err(StorageError::IoError)?,
        };
        debug!("mirror storage opened");

        let cursor_store = Arc::new(SledCursorStore::new(&db)?);
        let edge_store = Arc::new(SledEdgeStore::new(db)?);
        let provider = self
            .provider
            .unwrap_or_else(|| GrpcHandleProvider::from_settings(&self.settings));

        Ok(Mirror::new(
            self.settings,
            provider,
            edge_store,
            cursor_store,
            self.shutdown_signal,
        ))
    }
}
