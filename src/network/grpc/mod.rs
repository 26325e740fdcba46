//! gRPC implementation of the service handles.

mod bearer_token;
mod grpc_handle_provider;
mod permissions_client;

pub use bearer_token::*;
pub use grpc_handle_provider::*;
pub use permissions_client::*;
