//! Initialize ledger use case

use crate::domain::AppSettings;
use crate::error::Result;
use crate::infrastructure::{Config, FileSystemStorage, KeyValueStore, StorageKeys};
use log::info;
use std::fs;
use std::path::Path;

/// Initialize a new ledger at the specified path.
///
/// Writes the config and seeds default settings under `namespace`.
pub fn init(path: &Path, namespace: &str) -> Result<()> {
    Config::validate_namespace(namespace)?;

    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let mut storage = FileSystemStorage::new(path.to_path_buf());
    storage.initialize()?;

    let config = Config::new(namespace);
    storage.save_config(&config)?;

    let keys = StorageKeys::new(namespace);
    if storage.get(&keys.settings())?.is_none() {
        let settings = serde_json::to_string(&AppSettings::default())?;
        storage.set(&keys.settings(), &settings)?;
    }
    info!("initialized ledger at {} ({})", path.display(), namespace);

    println!("Initialized pilaris ledger at {}", path.display());
    println!("Namespace: {}", namespace);

    Ok(())
}
