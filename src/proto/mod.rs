//! Protocol Buffer definitions and generated code for the authorization
//! service APIs.
//!
//! The module tree mirrors the protobuf package hierarchy so the generated
//! cross-package paths (`super::super::v1::ZedToken`) resolve.

pub mod authzed {
    pub mod api {
        pub mod v1 {
            tonic::include_proto!("authzed.api.v1");
        }

        pub mod materialize {
            pub mod v0 {
                tonic::include_proto!("authzed.api.materialize.v0");
            }
        }
    }
}

pub use authzed::api::materialize::v0 as materialize;
pub use authzed::api::v1;
