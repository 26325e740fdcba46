use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the sled database
    #[serde(default = "default_db_dir")]
    pub db_root_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_root_dir: default_db_dir(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.db_root_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("db_root_dir cannot be empty".into()));
        }
        if self.db_root_dir.is_file() {
            return Err(Error::InvalidConfig(format!(
                "db_root_dir {:?} is a file",
                self.db_root_dir
            )));
        }
        Ok(())
    }
}

fn default_db_dir() -> PathBuf {
    PathBuf::from("./db")
}
