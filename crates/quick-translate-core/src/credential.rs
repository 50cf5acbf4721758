//! Persistence of the single API credential.
//!
//! Reads degrade to "not configured" on any storage failure; writes fail
//! loudly. Mutations are crate-private because every change must also
//! invalidate the cached API client, which only
//! [`ClientFactory`](crate::client::ClientFactory) can do.

use std::sync::Arc;
use tracing::warn;

use crate::error::{Error, Result};
use crate::storage::{CREDENTIAL_KEY, KeyValueStore};

#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Read the stored credential, or `None` if unset or unreadable
    pub fn get(&self) -> Option<String> {
        let bytes = match self.storage.get(CREDENTIAL_KEY) {
            Ok(bytes) => bytes?,
            Err(e) => {
                warn!("Failed to read API credential: {}", e);
                return None;
            }
        };

        match String::from_utf8(bytes) {
            Ok(value) if !value.trim().is_empty() => Some(value),
            Ok(_) => None,
            Err(_) => {
                warn!("Stored API credential is not valid UTF-8, ignoring it");
                None
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.get().is_some()
    }

    pub(crate) fn set(&self, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::Validation("API credential must not be empty".to_string()));
        }
        self.storage.set(CREDENTIAL_KEY, value.as_bytes())
    }

    pub(crate) fn clear(&self) -> Result<()> {
        self.storage.remove(CREDENTIAL_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::storage::MemoryStore;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(Error::Persistence("read failed".into()))
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
            Err(Error::Persistence("write failed".into()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(Error::Persistence("write failed".into()))
        }
    }

    fn memory_store() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_unset_credential_is_absent() {
        let store = memory_store();
        assert!(store.get().is_none());
        assert!(!store.is_configured());
    }

    #[test]
    fn test_set_trims_and_overwrites() {
        let store = memory_store();
        store.set("  sk-first  ").unwrap();
        assert_eq!(store.get().as_deref(), Some("sk-first"));

        store.set("sk-second").unwrap();
        assert_eq!(store.get().as_deref(), Some("sk-second"));
    }

    #[test]
    fn test_blank_credential_rejected() {
        let err = memory_store().set("   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_clear_removes_credential() {
        let store = memory_store();
        store.set("sk-key").unwrap();
        store.clear().unwrap();
        assert!(!store.is_configured());
    }

    #[test]
    fn test_read_failure_reads_as_absent() {
        let store = CredentialStore::new(Arc::new(BrokenStore));
        assert!(store.get().is_none());
    }

    #[test]
    fn test_write_failure_is_persistence_error() {
        let store = CredentialStore::new(Arc::new(BrokenStore));
        assert_eq!(store.set("sk-key").unwrap_err().kind(), ErrorKind::Persistence);
        assert_eq!(store.clear().unwrap_err().kind(), ErrorKind::Persistence);
    }
}
