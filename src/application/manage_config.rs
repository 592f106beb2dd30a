//! Config management use case

use crate::error::{PilarisError, Result};
use crate::infrastructure::{Config, FileSystemStorage};

/// Service for managing ledger configuration
pub struct ConfigService {
    storage: FileSystemStorage,
}

impl ConfigService {
    /// Create a new config service
    pub fn new(storage: FileSystemStorage) -> Self {
        ConfigService { storage }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.storage.load_config()?;

        match key {
            "namespace" => Ok(config.namespace),
            "currency" => Ok(config.currency),
            _ => Err(PilarisError::Config(format!(
                "Unknown config key: '{}'. Valid keys are: namespace, currency",
                key
            ))),
        }
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.storage.load_config()?;

        match key {
            "currency" => {
                config.currency = value.trim().to_uppercase();
            }
            "namespace" => {
                return Err(PilarisError::Config(
                    "Cannot modify 'namespace' (read-only): stored data is keyed by it"
                        .to_string(),
                ));
            }
            _ => {
                return Err(PilarisError::Config(format!(
                    "Unknown config key: '{}'. Valid keys are: currency",
                    key
                )));
            }
        }

        self.storage.save_config(&config)
    }

    /// List all config values
    pub fn list(&self) -> Result<Config> {
        self.storage.load_config()
    }
}
