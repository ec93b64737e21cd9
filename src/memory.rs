use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::KVError;
use crate::traits::AsyncStorage;

/// MemoryStorage keeps every entry in a process-local sorted map.
///
/// Nothing survives the process. Used for tests and for stores that only
/// need to live as long as the app session.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across all namespaces.
    pub fn len(&self) -> Result<usize, KVError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, KVError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, String>>, KVError> {
        self.entries
            .read()
            .map_err(|_| KVError::Storage("memory storage lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, String>>, KVError> {
        self.entries
            .write()
            .map_err(|_| KVError::Storage("memory storage lock poisoned".to_string()))
    }
}

#[async_trait]
impl AsyncStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KVError> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), KVError> {
        self.write()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), KVError> {
        self.write()?.remove(key);
        Ok(())
    }

    async fn get_all_keys(&self) -> Result<Vec<String>, KVError> {
        Ok(self.read()?.keys().cloned().collect())
    }

    async fn multi_remove(&self, keys: &[String]) -> Result<(), KVError> {
        let mut entries = self.write()?;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty().unwrap());

        storage.set_item("a", "1").await.unwrap();
        assert_eq!(storage.get_item("a").await.unwrap().as_deref(), Some("1"));

        storage.set_item("a", "2").await.unwrap();
        assert_eq!(storage.get_item("a").await.unwrap().as_deref(), Some("2"));
        assert_eq!(storage.len().unwrap(), 1);

        storage.remove_item("a").await.unwrap();
        assert!(storage.get_item("a").await.unwrap().is_none());

        // Removing again is fine.
        storage.remove_item("a").await.unwrap();
    }

    #[tokio::test]
    async fn keys_are_sorted_and_multi_remove_skips_missing() {
        let storage = MemoryStorage::new();
        for key in ["c", "a", "b"] {
            storage.set_item(key, "x").await.unwrap();
        }
        assert_eq!(storage.get_all_keys().await.unwrap(), vec!["a", "b", "c"]);

        storage
            .multi_remove(&["a".to_string(), "c".to_string(), "zzz".to_string()])
            .await
            .unwrap();
        assert_eq!(storage.get_all_keys().await.unwrap(), vec!["b"]);
    }

    #[test]
    fn poisoned_lock_reports_an_error() {
        let storage = std::sync::Arc::new(MemoryStorage::new());
        let held = std::sync::Arc::clone(&storage);
        let _ = std::thread::spawn(move || {
            let _guard = held.entries.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(storage.len(), Err(KVError::Storage(_))));
        assert!(storage.is_empty().is_err());
    }
}
