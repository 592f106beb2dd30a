//! Infrastructure layer - Persistence and configuration

pub mod config;
pub mod keys;
pub mod repository;
pub mod storage;

pub use config::Config;
pub use keys::{DayRecord, StorageKeys};
pub use repository::FileSystemStorage;
pub use storage::{KeyValueStore, MemoryStorage};
