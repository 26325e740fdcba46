mod sled_edge_store;

pub use sled_edge_store::*;
