use std::time::Duration;

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

use crate::init_sled_storage_db;
use crate::BackoffPolicy;
use crate::SledCursorStore;
use crate::SledEdgeStore;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
}

/// Opens both stores on one throwaway database
pub fn setup_stores() -> (SledEdgeStore, SledCursorStore, TempDir) {
    let tempdir = tempfile::tempdir().unwrap();
    let db = init_sled_storage_db(tempdir.path()).unwrap();
    let cursor_store = SledCursorStore::new(&db).unwrap();
    let edge_store = SledEdgeStore::new(db).unwrap();
    (edge_store, cursor_store, tempdir)
}

pub fn setup_edge_store() -> (SledEdgeStore, TempDir) {
    let (edge_store, _cursor_store, tempdir) = setup_stores();
    (edge_store, tempdir)
}

/// Reconnect policy that keeps tests fast
pub fn fast_backoff_policy() -> BackoffPolicy {
    BackoffPolicy {
        max_retries: 0,
        timeout_ms: 1000,
        base_delay_ms: 1,
        max_delay_ms: 5,
    }
}

/// Upper bound for any single wait in async tests
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);
