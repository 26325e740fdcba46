use tracing::debug;
use tracing::error;

use crate::proto::v1::permissions_service_client::PermissionsServiceClient;
use crate::proto::v1::RelationshipUpdate;
use crate::proto::v1::WriteRelationshipsRequest;
use crate::proto::v1::ZedToken;
use crate::AuthedChannel;
use crate::Result;

/// Writes relationships built by [`crate::relationship`] to the
/// permissions service.
#[derive(Clone)]
pub struct PermissionsClient {
    inner: PermissionsServiceClient<AuthedChannel>,
}

impl PermissionsClient {
    pub(crate) fn new(inner: PermissionsServiceClient<AuthedChannel>) -> Self {
        Self { inner }
    }

    /// Applies all updates atomically. Returns the revision the write
    /// landed at, when the service reports one.
    pub async fn write_relationships(
        &self,
        updates: Vec<RelationshipUpdate>,
    ) -> Result<Option<ZedToken>> {
        let mut client = self.inner.clone();
        let count = updates.len();
        match client.write_relationships(WriteRelationshipsRequest { updates }).await {
            Ok(response) => {
                debug!(count, "relationships written");
                Ok(response.into_inner().written_at)
            }
            Err(status) => {
                error!("WriteRelationships failed: {:?}", status);
                Err(status.into())
            }
        }
    }
}
