//! Destination tables of the change materializer.

#[cfg(test)]
use mockall::automock;

use crate::MemberToSet;
use crate::Result;
use crate::SetToSet;

#[cfg_attr(test, automock)]
pub trait EdgeStore: Send + Sync + 'static {
    /// Writes the row and its index entry as one unit.
    ///
    /// Rows are keyed by their natural key, so writing an edge that is
    /// already present leaves a single row. Returns `true` when the edge was
    /// not stored before.
    fn insert_set_to_set(
        &self,
        edge: &SetToSet,
    ) -> Result<bool>;

    fn insert_member_to_set(
        &self,
        edge: &MemberToSet,
    ) -> Result<bool>;

    /// Synchronously flushes all dirty IO buffers. Returns the number of
    /// bytes flushed during this call.
    fn flush(&self) -> Result<usize>;
}
