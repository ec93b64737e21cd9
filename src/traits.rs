use async_trait::async_trait;

use crate::error::KVError;

/// AsyncStorage is the persistent key-value facility a [`NamespacedStore`]
/// wraps. Keys and values are plain strings; every call may fail.
///
/// Implementations are expected to behave last-write-wins for concurrent
/// writes to the same key. No other ordering is assumed.
///
/// [`NamespacedStore`]: crate::NamespacedStore
#[async_trait]
pub trait AsyncStorage: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    async fn get_item(&self, key: &str) -> Result<Option<String>, KVError>;

    /// Set a key-value pair, overwriting any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), KVError>;

    /// List every key in the backend, including keys owned by other consumers.
    async fn get_all_keys(&self) -> Result<Vec<String>, KVError>;

    /// Delete a batch of keys in one operation. Missing keys are skipped.
    async fn multi_remove(&self, keys: &[String]) -> Result<(), KVError>;
}
