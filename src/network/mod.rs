//! Network abstraction for the watch feed.
//!
//! The synchronizer only needs two capabilities: something that can build a
//! fresh handle ([`HandleProvider`]) and a handle that can open a watch
//! subscription ([`WatchHandle`]). The gRPC implementation lives in [`grpc`];
//! tests substitute scripted feeds.

pub mod grpc;
mod handle_slot;

pub use grpc::*;
pub use handle_slot::*;


// Trait definition of the current module
// -----------------------------------------------------------------------------

use futures::stream::BoxStream;
use tonic::async_trait;

use crate::proto::materialize::WatchPermissionSetsResponse;
use crate::proto::v1::ZedToken;
use crate::Result;

/// Messages of one watch subscription, in server order.
pub type WatchStream =
    BoxStream<'static, std::result::Result<WatchPermissionSetsResponse, tonic::Status>>;

#[async_trait]
pub trait WatchHandle: Send + 'static {
    /// Opens a subscription delivering changes after `starting_after`, or
    /// from the beginning of recorded history when `None`.
    async fn subscribe(
        &mut self,
        starting_after: Option<ZedToken>,
    ) -> Result<WatchStream>;
}

/// Builds handles to the watch feed.
///
/// Must be callable repeatedly and must not assume an earlier handle is
/// still usable. An error means the handle can never be built with the
/// current configuration.
pub trait HandleProvider: Send + Sync + 'static {
    type Handle: WatchHandle + Clone;

    fn acquire(&self) -> Result<Self::Handle>;
}
