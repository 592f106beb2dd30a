//! Error types for pilaris

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the pilaris ledger
#[derive(Debug, Error)]
pub enum PilarisError {
    #[error("Not a pilaris directory: {0}")]
    NotPilarisDirectory(PathBuf),

    #[error("Invalid date reference: {0}")]
    InvalidDateReference(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("At least one service is required")]
    LastService,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl PilarisError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PilarisError::NotPilarisDirectory(_) => 2,
            PilarisError::InvalidDateReference(_) => 3,
            PilarisError::NotFound(_) => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            PilarisError::NotPilarisDirectory(path) => {
                format!(
                    "Not a pilaris directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'pilaris init' in this directory to create a new ledger\n\
                    • Navigate to an existing pilaris directory\n\
                    • Set PILARIS_ROOT environment variable to your ledger path",
                    path.display()
                )
            }
            PilarisError::InvalidDateReference(ref_str) => {
                format!(
                    "Invalid date reference: '{}'\n\n\
                    Valid date references:\n\
                    • today, yesterday, tomorrow\n\
                    • day offsets: +1, -7\n\
                    • Specific dates: YYYY-MM-DD (e.g., 2025-01-17)\n\n\
                    Examples:\n\
                    pilaris --date yesterday show\n\
                    pilaris --date 2025-01-15 report",
                    ref_str
                )
            }
            PilarisError::NotFound(what) => {
                format!(
                    "Not found: {}\n\n\
                    Suggestions:\n\
                    • Use 'pilaris show' to see slot times and seat ids\n\
                    • Use 'pilaris expense list' or 'pilaris service list' to see ids\n\
                    • Check the --date you are editing",
                    what
                )
            }
            PilarisError::LastService => {
                "At least one service is required\n\n\
                Add another service first: pilaris service add <NAME> <PRICE>"
                    .to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using PilarisError
pub type Result<T> = std::result::Result<T, PilarisError>;
