use std::time::Duration;

use tonic::async_trait;
use tonic::transport::Certificate;
use tonic::transport::Channel;
use tonic::transport::ClientTlsConfig;
use tonic::transport::Endpoint;
use tracing::debug;
use tracing::info;

use crate::proto::materialize::watch_permission_sets_service_client::WatchPermissionSetsServiceClient;
use crate::proto::materialize::WatchPermissionSetsRequest;
use crate::proto::v1::permissions_service_client::PermissionsServiceClient;
use crate::proto::v1::ZedToken;
use crate::AuthedChannel;
use crate::AuthzedConfig;
use crate::BackoffPolicy;
use crate::BearerToken;
use crate::HandleProvider;
use crate::NetworkError;
use crate::PermissionsClient;
use crate::Result;
use crate::Settings;
use crate::TlsConfig;
use crate::WatchHandle;
use crate::WatchStream;

const TCP_KEEPALIVE: Duration = Duration::from_secs(60);
const HTTP2_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);
const HTTP2_KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(20);

/// Watch feed handle: a generated client over an authenticated channel
pub type GrpcWatchHandle = WatchPermissionSetsServiceClient<AuthedChannel>;

/// Builds authenticated channels to the watch feed and permissions service.
///
/// Channels connect lazily; `acquire` only fails when the credentials or
/// the address can never work, which callers treat as fatal.
#[derive(Debug, Clone)]
pub struct GrpcHandleProvider {
    authzed: AuthzedConfig,
    tls: TlsConfig,
    connect_timeout: Duration,
}

impl GrpcHandleProvider {
    pub fn new(
        authzed: AuthzedConfig,
        tls: TlsConfig,
        policy: &BackoffPolicy,
    ) -> Self {
        Self {
            authzed,
            tls,
            connect_timeout: Duration::from_millis(policy.timeout_ms),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.authzed.clone(),
            settings.tls.clone(),
            &settings.retry.watch,
        )
    }

    /// Handle for writing relationships to the permissions service
    pub fn permissions_client(&self) -> Result<PermissionsClient> {
        let channel = self.build_channel(&self.authzed.spicedb_endpoint)?;
        let bearer = BearerToken::new(&self.authzed.token)?;
        Ok(PermissionsClient::new(PermissionsServiceClient::with_interceptor(
            channel, bearer,
        )))
    }

    pub(crate) fn build_channel(
        &self,
        address: &str,
    ) -> Result<Channel> {
        debug!("build_channel, addr = {:?}", address);
        let mut endpoint = Endpoint::from_shared(address.to_string())
            .map_err(|e| NetworkError::InvalidURI(format!("{address}: {e}")))?
            .connect_timeout(self.connect_timeout)
            .tcp_keepalive(Some(TCP_KEEPALIVE))
            .http2_keep_alive_interval(HTTP2_KEEPALIVE_INTERVAL)
            .keep_alive_timeout(HTTP2_KEEPALIVE_TIMEOUT)
            .keep_alive_while_idle(true);

        if self.tls.enable_tls {
            endpoint = endpoint.tls_config(client_tls_config(&self.tls)?).map_err(|e| {
                NetworkError::Credentials(format!("unable to apply TLS config: {e}"))
            })?;
        }

        Ok(endpoint.connect_lazy())
    }
}

impl HandleProvider for GrpcHandleProvider {
    type Handle = GrpcWatchHandle;

    fn acquire(&self) -> Result<Self::Handle> {
        let channel = self.build_channel(&self.authzed.materialize_endpoint)?;
        let bearer = BearerToken::new(&self.authzed.token)?;
        info!(
            endpoint = %self.authzed.materialize_endpoint,
            tls = self.tls.enable_tls,
            "watch handle acquired"
        );
        Ok(WatchPermissionSetsServiceClient::with_interceptor(
            channel, bearer,
        ))
    }
}

#[async_trait]
impl WatchHandle for GrpcWatchHandle {
    async fn subscribe(
        &mut self,
        starting_after: Option<ZedToken>,
    ) -> Result<WatchStream> {
        let request = WatchPermissionSetsRequest {
            optional_starting_after: starting_after,
        };
        let response = self.watch_permission_sets(request).await?;
        debug!("watch stream established");
        Ok(Box::pin(response.into_inner()))
    }
}

/// Root of trust: the configured CA bundle, or the system store.
pub(crate) fn client_tls_config(tls: &TlsConfig) -> Result<ClientTlsConfig> {
    let mut config = ClientTlsConfig::new();
    config = match &tls.certificate_authority_root_path {
        Some(path) => {
            let pem = std::fs::read(path).map_err(|e| {
                NetworkError::Credentials(format!("unable to read CA certificates {path:?}: {e}"))
            })?;
            config.ca_certificate(Certificate::from_pem(pem))
        }
        None => config.with_native_roots(),
    };
    if let Some(domain) = &tls.domain_name {
        config = config.domain_name(domain.clone());
    }
    Ok(config)
}
