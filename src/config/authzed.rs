use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Endpoints and bearer token for the authorization service.
///
/// The watch feed and the permissions API are usually served by different
/// processes, so each has its own address. Both share the same token.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AuthzedConfig {
    /// Permissions service address (relationship writes)
    #[serde(default)]
    pub spicedb_endpoint: String,

    /// Watch permission sets service address
    #[serde(default)]
    pub materialize_endpoint: String,

    /// Bearer token presented on every call
    #[serde(default)]
    pub token: String,
}

impl AuthzedConfig {
    /// # Errors
    /// Returns `Error::InvalidConfig` when an endpoint or the token is missing
    pub fn validate(&self) -> Result<()> {
        if self.materialize_endpoint.trim().is_empty() {
            return Err(Error::InvalidConfig("materialize_endpoint must be set".into()));
        }
        if self.spicedb_endpoint.trim().is_empty() {
            return Err(Error::InvalidConfig("spicedb_endpoint must be set".into()));
        }
        if self.token.trim().is_empty() {
            return Err(Error::InvalidConfig("token must be set".into()));
        }
        Ok(())
    }
}
