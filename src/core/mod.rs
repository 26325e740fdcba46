//! The change-stream synchronizer.
//!
//! [`PermissionSetWatcher`] keeps a subscription to the watch feed alive and
//! hands every change to the [`ChangeMaterializer`], which turns it into a
//! row of one of the two edge tables.

mod materializer;
mod watcher;

pub use materializer::*;
pub use watcher::*;
