//! Persisted translation history, newest first.
//!
//! The whole list lives under a single storage key. Every mutation is a
//! read-modify-write of that list with no locking, so two writers racing in
//! different processes can lose an update.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::storage::{HISTORY_KEY, KeyValueStore};
use crate::translator::TranslationResult;

#[derive(Clone)]
pub struct HistoryCache {
    storage: Arc<dyn KeyValueStore>,
}

impl HistoryCache {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Prepend `result` to the stored history
    pub fn save(&self, result: &TranslationResult) -> Result<()> {
        let mut history = self.get_all();
        history.insert(0, result.clone());
        self.write(&history)?;
        debug!("Saved translation to history ({} entries)", history.len());
        Ok(())
    }

    /// All stored results, newest first; empty if missing or unreadable
    pub fn get_all(&self) -> Vec<TranslationResult> {
        let bytes = match self.storage.get(HISTORY_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read translation history: {}", e);
                return Vec::new();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!("Stored translation history is corrupt, ignoring it: {}", e);
            Vec::new()
        })
    }

    pub fn clear(&self) -> Result<()> {
        self.write(&[])
    }

    /// Remove every entry whose timestamp is exactly `timestamp`.
    ///
    /// Returns how many entries were removed.
    pub fn delete_by_timestamp(&self, timestamp: i64) -> Result<usize> {
        let mut history = self.get_all();
        let before = history.len();
        history.retain(|entry| entry.timestamp != timestamp);
        self.write(&history)?;
        Ok(before - history.len())
    }

    fn write(&self, history: &[TranslationResult]) -> Result<()> {
        let bytes = serde_json::to_vec(history)
            .map_err(|e| Error::Persistence(format!("Failed to serialize history: {e}")))?;
        self.storage.set(HISTORY_KEY, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Lang;
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

    fn entry(text: &str, timestamp: i64) -> TranslationResult {
        TranslationResult {
            original_text: text.to_string(),
            translated_text: format!("[fr] {text}"),
            source_language: Lang::new("en"),
            target_language: Lang::new("fr"),
            timestamp,
            confidence: None,
            alternatives: None,
        }
    }

    fn memory_history() -> HistoryCache {
        HistoryCache::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_missing_history_is_empty() {
        assert!(memory_history().get_all().is_empty());
    }

    #[test]
    fn test_save_prepends() {
        let history = memory_history();
        history.save(&entry("one", 1)).unwrap();
        history.save(&entry("two", 2)).unwrap();
        history.save(&entry("three", 3)).unwrap();

        let all = history.get_all();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], entry("three", 3));
        assert_eq!(all[2], entry("one", 1));
    }

    #[test]
    fn test_duplicate_saves_are_kept() {
        let history = memory_history();
        let result = entry("hello", 7);
        history.save(&result).unwrap();
        history.save(&result).unwrap();
        assert_eq!(history.get_all().len(), 2);
    }

    #[test]
    fn test_delete_removes_all_matching_timestamps() {
        let history = memory_history();
        history.save(&entry("a", 1)).unwrap();
        history.save(&entry("b", 2)).unwrap();
        history.save(&entry("c", 2)).unwrap();
        history.save(&entry("d", 3)).unwrap();

        assert_eq!(history.delete_by_timestamp(2).unwrap(), 2);

        let remaining: Vec<_> = history.get_all().into_iter().map(|e| e.timestamp).collect();
        assert_eq!(remaining, vec![3, 1]);
    }

    #[test]
    fn test_delete_unknown_timestamp_is_noop() {
        let history = memory_history();
        history.save(&entry("a", 1)).unwrap();
        assert_eq!(history.delete_by_timestamp(99).unwrap(), 0);
        assert_eq!(history.get_all().len(), 1);
    }

    #[test]
    fn test_clear_empties_history() {
        let history = memory_history();
        history.save(&entry("a", 1)).unwrap();
        history.clear().unwrap();
        assert!(history.get_all().is_empty());
    }

    #[test]
    fn test_corrupt_history_reads_as_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(HISTORY_KEY, b"{not a list").unwrap();
        let history = HistoryCache::new(storage);

        assert!(history.get_all().is_empty());
        history.save(&entry("fresh", 5)).unwrap();
        assert_eq!(history.get_all(), vec![entry("fresh", 5)]);
    }

    #[test]
    fn test_reads_degrade_but_writes_fail() {
        let history = HistoryCache::new(Arc::new(BrokenStore));
        assert!(history.get_all().is_empty());
        assert_eq!(history.save(&entry("a", 1)).unwrap_err().kind(), ErrorKind::Persistence);
        assert_eq!(history.clear().unwrap_err().kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_reads_records_without_optional_fields() {
        let storage = Arc::new(MemoryStore::new());
        let stored = br#"[{"originalText":"hola","translatedText":"hello","sourceLanguage":"es","targetLanguage":"en","timestamp":1718000000000}]"#;
        storage.set(HISTORY_KEY, stored).unwrap();

        let all = HistoryCache::new(storage).get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].source_language.as_str(), "es");
        assert!(all[0].alternatives.is_none());
    }
}
