//! Key-value stores
//!
//! The portal persists four JSON records under string keys. Anything that can
//! get and set a string by key can back it:
//! - `MemoryStore` for tests and throwaway sessions
//! - `FileStore`, one `<key>.json` file per record
//! - `SqliteStore`, a single `kv` table

pub mod file;
pub mod memory;
pub mod sqlite;

use anyhow::Result;

use crate::config::{Backend, StorageConfig};

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// String-keyed get/set store
pub trait KvStore {
    /// Read the raw value for a key, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value for a key
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Forget a key; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Open the backend selected in configuration
pub fn open(config: &StorageConfig) -> Result<Box<dyn KvStore>> {
    let store: Box<dyn KvStore> = match config.backend {
        Backend::Memory => Box::new(MemoryStore::new()),
        Backend::File => Box::new(FileStore::with_dir(config.resolved_data_dir()?)?),
        Backend::Sqlite => {
            let path = config.resolved_data_dir()?.join("portal.db");
            Box::new(SqliteStore::open(path)?)
        }
    };
    tracing::debug!("Opened {} store", config.backend);
    Ok(store)
}
