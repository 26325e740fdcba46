use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TlsConfig {
    /// Enables TLS for both service connections
    /// Default: true
    #[serde(default = "default_enable_tls")]
    pub enable_tls: bool,

    /// PEM bundle used as root of trust instead of the system store
    /// Default: none (system certificates)
    #[serde(default)]
    pub certificate_authority_root_path: Option<PathBuf>,

    /// Overrides the server name checked against the certificate
    #[serde(default)]
    pub domain_name: Option<String>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            enable_tls: default_enable_tls(),
            certificate_authority_root_path: None,
            domain_name: None,
        }
    }
}

impl TlsConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.enable_tls && self.certificate_authority_root_path.is_some() {
            return Err(Error::InvalidConfig(
                "certificate_authority_root_path is set but TLS is disabled".into(),
            ));
        }
        Ok(())
    }
}

fn default_enable_tls() -> bool {
    true
}
