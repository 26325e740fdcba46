//! Local mirror of the permission-set graph of a SpiceDB-style authorization
//! service.
//!
//! The service publishes a watch feed of permission-set changes. This crate
//! keeps a subscription to it open and materializes every change as an edge
//! in one of two local tables:
//! - `SetToSet`: a set contains another set;
//! - `MemberToSet`: an object is a member of a set.
//!
//! ```ignore
//! let (shutdown_tx, shutdown_rx) = watch::channel(());
//! let mirror = MirrorBuilder::init(Settings::load()?, shutdown_rx).build()?;
//! let edges = mirror.edge_store();
//! tokio::spawn(mirror.run());
//! ```

mod config;
mod constants;
mod core;
mod errors;
pub mod metrics;
mod mirror;
mod network;
pub mod proto;
pub mod relationship;
mod storage;
mod utils;

pub use crate::core::*;

pub use config::*;
pub use errors::*;
pub use mirror::*;
pub use network::*;
pub use storage::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
