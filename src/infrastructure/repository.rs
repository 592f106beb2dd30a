//! File system storage: one file per key under `.pilaris/data/`

use crate::error::{PilarisError, Result};
use crate::infrastructure::storage::KeyValueStore;
use crate::infrastructure::Config;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const STATE_DIR: &str = ".pilaris";
const DATA_DIR: &str = "data";
const VALUE_EXT: &str = ".json";

/// Directory-backed implementation of [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    pub root: PathBuf,
}

impl FileSystemStorage {
    /// Create a storage handle for the given ledger root
    pub fn new(root: PathBuf) -> Self {
        FileSystemStorage { root }
    }

    /// Discover the ledger root by walking up from the current directory
    /// First checks PILARIS_ROOT environment variable, then falls back to discovery
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var("PILARIS_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_state_dir(&path) {
                return Ok(FileSystemStorage::new(path));
            } else {
                return Err(PilarisError::Config(format!(
                    "PILARIS_ROOT is set to '{}' but no .pilaris directory found. \
                    Run 'pilaris init' in that directory or unset PILARIS_ROOT.",
                    path.display()
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover the ledger root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_state_dir(&current) {
                return Ok(FileSystemStorage::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(PilarisError::NotPilarisDirectory(start.to_path_buf())),
            }
        }
    }

    fn has_state_dir(path: &Path) -> bool {
        path.join(STATE_DIR).is_dir()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_initialized(&self) -> bool {
        Self::has_state_dir(&self.root)
    }

    /// Create the `.pilaris/data` directory structure
    pub fn initialize(&self) -> Result<()> {
        let state_dir = self.root.join(STATE_DIR);

        if state_dir.exists() {
            return Err(PilarisError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir_all(state_dir.join(DATA_DIR))?;
        Ok(())
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR).join(DATA_DIR)
    }

    fn value_path(&self, key: &str) -> Result<PathBuf> {
        Ok(self.data_dir().join(encode_key(key)?))
    }
}

/// Keys become file names; `:` (slot times) and `%` are escaped
fn encode_key(key: &str) -> Result<String> {
    if key.is_empty() || key.contains(|c: char| c == '/' || c == '\\') || key.starts_with('.') {
        return Err(PilarisError::Storage(format!("Invalid storage key: '{}'", key)));
    }
    Ok(format!(
        "{}{}",
        key.replace('%', "%25").replace(':', "%3A"),
        VALUE_EXT
    ))
}

fn decode_key(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(VALUE_EXT)?;
    Some(stem.replace("%3A", ":").replace("%25", "%"))
}

impl KeyValueStore for FileSystemStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PilarisError::Io(e)),
        }
    }

    /// Best-effort atomic replace: write a temp file next to the target, then rename.
    ///
    /// On Windows, `rename` does not overwrite existing files, so the destination goes first.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key)?;

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = path.with_file_name(format!(
            ".{}.tmp-{}",
            encode_key(key)?,
            std::process::id()
        ));
        fs::write(&tmp_path, value)?;

        if cfg!(windows) && path.exists() {
            fs::remove_file(&path)?;
        }

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.value_path(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PilarisError::Io(e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let data_dir = self.data_dir();
        if !data_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&data_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| PilarisError::Storage(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if let Some(key) = decode_key(name) {
                keys.push(key);
            }
        }

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn initialized() -> (TempDir, FileSystemStorage) {
        let temp = TempDir::new().unwrap();
        let storage = FileSystemStorage::new(temp.path().to_path_buf());
        storage.initialize().unwrap();
        (temp, storage)
    }

    #[test]
    fn test_initialize_creates_data_dir() {
        let (temp, storage) = initialized();
        assert!(temp.path().join(".pilaris/data").is_dir());
        assert!(storage.is_initialized());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let (_temp, storage) = initialized();
        assert!(storage.initialize().is_err());
    }

    #[test]
    fn test_set_get_remove() {
        let (_temp, mut storage) = initialized();

        assert_eq!(storage.get("ns_settings").unwrap(), None);
        storage.set("ns_settings", "{}").unwrap();
        storage.set("ns_settings", "{\"a\":1}").unwrap();
        assert_eq!(storage.get("ns_settings").unwrap().as_deref(), Some("{\"a\":1}"));

        storage.remove("ns_settings").unwrap();
        storage.remove("ns_settings").unwrap();
        assert_eq!(storage.get("ns_settings").unwrap(), None);
    }

    #[test]
    fn test_keys_round_trip_colons() {
        let (temp, mut storage) = initialized();
        storage.set("ns_notified_2025-01-01_08:00", "true").unwrap();
        storage.set("ns_2025-01-01_schedule", "[]").unwrap();
        fs::write(temp.path().join(".pilaris/data/stray.txt"), "x").unwrap();

        let mut keys = storage.keys().unwrap();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "ns_2025-01-01_schedule".to_string(),
                "ns_notified_2025-01-01_08:00".to_string(),
            ]
        );
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let (_temp, mut storage) = initialized();
        assert!(storage.set("../escape", "x").is_err());
        assert!(storage.get("a/b").is_err());
        assert!(storage.set("", "x").is_err());
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let (temp, _storage) = initialized();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = FileSystemStorage::discover_from(&nested).unwrap();
        assert_eq!(found.root(), temp.path());
    }
}
