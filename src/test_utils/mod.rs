//! the test_utils folder here will share utils or test components between
//! unit tests
mod common;
mod edge_builder;

pub use common::*;
pub use edge_builder::*;
pub use mock::*;
