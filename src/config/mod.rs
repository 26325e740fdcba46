//! Configuration for the permission-set mirror.
//!
//! Sources are merged with the following priority (lowest first):
//! 1. Default values (hardcoded)
//! 2. Legacy environment variables (`SPICEDB_ENDPOINT`, `MATERIALIZE_ENDPOINT`,
//!    `AUTHZED_TOKEN`)
//! 3. Config file named by `CONFIG_PATH`
//! 4. `PERMSET__SECTION__FIELD` environment variables (highest priority)

mod authzed;
mod monitoring;
mod retry;
mod storage;
mod tls;
pub use authzed::*;
pub use monitoring::*;
pub use retry::*;
pub use storage::*;
pub use tls::*;


//---
use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

const ENV_PREFIX: &str = "PERMSET";
const LEGACY_ENV_VARS: [(&str, &str); 3] = [
    ("SPICEDB_ENDPOINT", "authzed.spicedb_endpoint"),
    ("MATERIALIZE_ENDPOINT", "authzed.materialize_endpoint"),
    ("AUTHZED_TOKEN", "authzed.token"),
];

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Settings {
    /// Authorization service endpoints and credentials
    #[serde(default)]
    pub authzed: AuthzedConfig,
    /// Transport security for both service connections
    #[serde(default)]
    pub tls: TlsConfig,
    /// Local mirror storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// Reconnect policies
    #[serde(default)]
    pub retry: RetryPolicies,
    /// Metrics exporter settings
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

impl Settings {
    /// Load and validate configuration from every supported source.
    pub fn load() -> Result<Self> {
        let mut config = Config::builder();

        // 2. Legacy variables, kept for deployments that predate the prefix
        for (var, key) in LEGACY_ENV_VARS {
            if let Ok(value) = env::var(var) {
                if !value.is_empty() {
                    config = config.set_default(key, value)?;
                }
            }
        }

        // 3. Config file
        if let Ok(path) = env::var("CONFIG_PATH") {
            config = config.add_source(File::with_name(&path).required(true));
        }

        // 4. Environment variables
        config = config.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: Settings = config.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks every section, failing on the first violation.
    pub fn validate(&self) -> Result<()> {
        self.authzed.validate()?;
        self.tls.validate()?;
        self.storage.validate()?;
        self.retry.validate()?;
        self.monitoring.validate()?;
        Ok(())
    }
}
