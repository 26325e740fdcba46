//! Durable home of the watch feed resume cursor.

#[cfg(test)]
use mockall::automock;

use crate::Result;

#[cfg_attr(test, automock)]
pub trait CursorStore: Send + Sync + 'static {
    /// Token of the last completed revision, if one was ever recorded
    fn load_resume_cursor(&self) -> Result<Option<String>>;

    /// Replaces the stored token and flushes it to disk
    fn save_resume_cursor(
        &self,
        token: &str,
    ) -> Result<()>;
}
