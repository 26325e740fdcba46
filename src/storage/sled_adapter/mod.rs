// Submodule declaration
// -----------------------------------------------------------------------------
mod cursor_store;
mod edge_store;

// Re-export
// -----------------------------------------------------------------------------
pub use cursor_store::*;
pub use edge_store::*;
