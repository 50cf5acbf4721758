mod memory;
mod disk;

pub use memory::MemoryStore;
pub use disk::DiskStore;

use crate::config::StorageConfig;
use crate::error::Result;
use std::sync::Arc;

/// Storage key holding the API credential
pub const CREDENTIAL_KEY: &str = "TN_API_TOKEN";
/// Storage key holding the serialized translation history
pub const HISTORY_KEY: &str = "translation_history";

/// Persistent key-value storage shared by the credential store and the history.
///
/// Reads report failures as errors; it is up to the caller to decide whether
/// a failed read degrades to "absent".
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Open the on-disk store described by the configuration
pub fn open(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store = DiskStore::new(config.resolved_path())?;
    Ok(Arc::new(store))
}
