//! Configuration management

use crate::error::{PilarisError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_NAMESPACE: &str = "pilaris_control";
pub const DEFAULT_CURRENCY: &str = "BRL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Prefix of every storage key; fixed for the lifetime of a ledger
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub created: DateTime<Utc>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Config {
    /// Create a new config for the given key namespace
    pub fn new(namespace: &str) -> Self {
        Config {
            namespace: namespace.to_string(),
            currency: default_currency(),
            created: Utc::now(),
        }
    }

    /// Load config from .pilaris/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(".pilaris").join("config.toml");

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PilarisError::NotPilarisDirectory(path.to_path_buf())
            } else {
                PilarisError::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| PilarisError::Config(format!("Failed to parse config.toml: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to .pilaris/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let pilaris_dir = path.join(".pilaris");
        if !pilaris_dir.exists() {
            fs::create_dir(&pilaris_dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(pilaris_dir.join("config.toml"), contents)?;
        Ok(())
    }

    /// Namespaces end up in file names, so keep them to a safe alphabet
    pub fn validate_namespace(namespace: &str) -> Result<()> {
        let valid = !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(PilarisError::Config(format!(
                "Invalid namespace: '{}'. Use letters, digits, '_' or '-'",
                namespace
            )))
        }
    }

    fn validate(&self) -> Result<()> {
        Self::validate_namespace(&self.namespace)?;
        if self.currency.trim().is_empty() {
            return Err(PilarisError::Config("Currency must not be empty".to_string()));
        }
        Ok(())
    }
}
