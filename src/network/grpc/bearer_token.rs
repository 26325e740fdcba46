use tonic::metadata::Ascii;
use tonic::metadata::MetadataValue;
use tonic::service::interceptor::InterceptedService;
use tonic::service::Interceptor;
use tonic::transport::Channel;
use tonic::Request;
use tonic::Status;

use crate::NetworkError;
use crate::Result;

/// Channel that attaches the bearer token to every call
pub type AuthedChannel = InterceptedService<Channel, BearerToken>;

/// Interceptor adding `authorization: Bearer <token>` metadata.
#[derive(Clone)]
pub struct BearerToken {
    header: MetadataValue<Ascii>,
}

impl std::fmt::Debug for BearerToken {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("BearerToken").field("header", &"<redacted>").finish()
    }
}

impl BearerToken {
    pub fn new(token: &str) -> Result<Self> {
        let header = format!("Bearer {token}")
            .parse::<MetadataValue<Ascii>>()
            .map_err(|e| {
                NetworkError::Credentials(format!("token is not valid header metadata: {e}"))
            })?;
        Ok(Self { header })
    }
}

impl Interceptor for BearerToken {
    fn call(
        &mut self,
        mut request: Request<()>,
    ) -> std::result::Result<Request<()>, Status> {
        request.metadata_mut().insert("authorization", self.header.clone());
        Ok(request)
    }
}
