//! Infrastructure layer: item storage, the directory service, config.

pub mod config;
pub mod directory;
pub mod store;


pub use config::{AppConfig, ConfigError, LogFormat};
pub use directory::{DirectoryError, ItemDirectory, LiveItems, WriteFailure, WriteHandle};
pub use store::{InMemoryItemStore, ItemStore, PostgresItemStore, StoreError};
