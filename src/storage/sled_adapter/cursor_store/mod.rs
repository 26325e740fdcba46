use tracing::debug;

use crate::constants::WATCH_STATE_RESUME_CURSOR_KEY;
use crate::constants::WATCH_STATE_TREE;
use crate::CursorStore;
use crate::Result;
use crate::StorageError;


#[derive(Clone)]
pub struct SledCursorStore {
    tree: sled::Tree,
}

impl std::fmt::Debug for SledCursorStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SledCursorStore")
            .field("tree_len", &self.tree.len())
            .finish()
    }
}

impl CursorStore for SledCursorStore {
    fn load_resume_cursor(&self) -> Result<Option<String>> {
        match self.tree.get(WATCH_STATE_RESUME_CURSOR_KEY)? {
            Some(ivec) => {
                let token = String::from_utf8(ivec.to_vec()).map_err(|e| {
                    StorageError::DataCorruption {
                        location: format!("{WATCH_STATE_TREE}:{WATCH_STATE_RESUME_CURSOR_KEY} ({e})"),
                    }
                })?;
                debug!("found resume cursor with key: {}", WATCH_STATE_RESUME_CURSOR_KEY);
                Ok(Some(token))
            }
            None => {
                debug!("no resume cursor found with key: {}", WATCH_STATE_RESUME_CURSOR_KEY);
                Ok(None)
            }
        }
    }

    fn save_resume_cursor(
        &self,
        token: &str,
    ) -> Result<()> {
        self.tree.insert(WATCH_STATE_RESUME_CURSOR_KEY, token.as_bytes())?;
        let bytes = self.tree.flush()?;
        debug!(bytes, "resume cursor flushed");
        Ok(())
    }
}

impl SledCursorStore {
    pub fn new(db: &sled::Db) -> Result<Self> {
        Ok(Self {
            tree: db.open_tree(WATCH_STATE_TREE)?,
        })
    }
}
