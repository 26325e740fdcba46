//! Local mirror storage: the two edge tables and the watch state.

mod cursor_store;
mod edge;
mod edge_store;
mod sled_adapter;

use std::path::Path;

pub use cursor_store::*;
pub use edge::*;
pub use edge_store::*;
pub use sled_adapter::*;
use tracing::debug;
use tracing::warn;

use crate::constants::MIRROR_DB_DIR;

/// Opens (or creates) the mirror database under `sled_db_root_path`.
pub fn init_sled_storage_db(
    sled_db_root_path: impl AsRef<Path> + std::fmt::Debug
) -> std::result::Result<sled::Db, std::io::Error> {
    debug!("init_sled_storage_db from path: {:?}", &sled_db_root_path);

    let db_path = sled_db_root_path.as_ref().join(MIRROR_DB_DIR);

    sled::Config::default()
        .path(&db_path)
        .cache_capacity(64 * 1024 * 1024) //64MB
        .flush_every_ms(Some(100))
        .use_compression(true)
        .compression_factor(1)
        .open()
        .map_err(|e| {
            warn!(
                "Try to open DB at this location: {:?} and failed: {:?}",
                db_path, e
            );
            std::io::Error::other(e)
        })
}
