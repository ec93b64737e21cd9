//! NamespacedStore: a best-effort façade over an [`AsyncStorage`] backend.
//!
//! Every logical key is sanitized and prefixed before it reaches the backend,
//! so several consumers can share one backend without stepping on each
//! other. Backend failures never reach the caller: reads fall back to `None`,
//! writes complete normally, and the failure is logged, kept in
//! [`NamespacedStore::last_error`] and passed to the optional observer.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{DEFAULT_PREFIX, StoreConfig};
use crate::error::KVError;
use crate::traits::AsyncStorage;
use crate::value::StoredValue;

/// Which store operation a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Get,
    Set,
    Remove,
    Clear,
    Keys,
}

/// A failure swallowed by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageFailure {
    pub op: StorageOp,
    /// Physical key involved. None for namespace-wide operations.
    pub key: Option<String>,
    pub error: KVError,
}

/// Callback invoked for every swallowed failure.
pub type FailureObserver = Arc<dyn Fn(&StorageFailure) + Send + Sync>;

/// Replace every character outside `[a-zA-Z0-9_-]` with `_`.
///
/// Distinct keys can map to the same result (`"a.b"` and `"a b"`).
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub struct NamespacedStore {
    backend: Arc<dyn AsyncStorage>,
    prefix: String,
    last_error: Mutex<Option<StorageFailure>>,
    observer: Option<FailureObserver>,
}

impl NamespacedStore {
    /// Wrap a backend using the default `finquest_` namespace.
    pub fn new(backend: Arc<dyn AsyncStorage>) -> Self {
        Self::with_prefix(backend, DEFAULT_PREFIX)
    }

    /// Wrap a backend under a custom namespace.
    ///
    /// `clear()` deletes every backend key starting with the prefix, so
    /// namespaces sharing one backend must not be prefixes of each other
    /// (`"fin"` would swallow `"finquest_"`). An empty prefix would match
    /// every key and falls back to [`DEFAULT_PREFIX`].
    pub fn with_prefix(backend: Arc<dyn AsyncStorage>, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if prefix.is_empty() {
            warn!("empty namespace prefix, using {}", DEFAULT_PREFIX);
            prefix = DEFAULT_PREFIX.to_string();
        }
        Self {
            backend,
            prefix,
            last_error: Mutex::new(None),
            observer: None,
        }
    }

    pub fn from_config(backend: Arc<dyn AsyncStorage>, config: &StoreConfig) -> Self {
        Self::with_prefix(backend, config.prefix.clone())
    }

    /// Register a callback that sees every swallowed failure.
    pub fn with_observer(mut self, observer: FailureObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Map a logical key to the physical key stored in the backend.
    pub fn get_key_with_prefix(&self, key: &str) -> String {
        format!("{}{}", self.prefix, sanitize_key(key))
    }

    /// Read a value. Returns None both when the key was never set and when
    /// the backend read failed.
    pub async fn get_item(&self, key: &str) -> Option<String> {
        let physical = self.get_key_with_prefix(key);
        debug!("get_item: {}", physical);

        match self.backend.get_item(&physical).await {
            Ok(value) => {
                debug!("get_item: {} found={}", physical, value.is_some());
                value
            }
            Err(e) => {
                self.record(StorageOp::Get, Some(physical), e);
                None
            }
        }
    }

    /// Write a value. Strings are stored as-is, anything else as JSON.
    pub async fn set_item(&self, key: &str, value: impl Into<StoredValue>) {
        let physical = self.get_key_with_prefix(key);
        debug!("set_item: {}", physical);

        let value: StoredValue = value.into();
        let encoded = match value.into_stored_string() {
            Ok(s) => s,
            Err(e) => {
                self.record(StorageOp::Set, Some(physical), e);
                return;
            }
        };

        match self.backend.set_item(&physical, &encoded).await {
            Ok(()) => debug!("set_item: {} stored {} bytes", physical, encoded.len()),
            Err(e) => self.record(StorageOp::Set, Some(physical), e),
        }
    }

    pub async fn remove_item(&self, key: &str) {
        let physical = self.get_key_with_prefix(key);
        debug!("remove_item: {}", physical);

        match self.backend.remove_item(&physical).await {
            Ok(()) => debug!("remove_item: {} removed", physical),
            Err(e) => self.record(StorageOp::Remove, Some(physical), e),
        }
    }

    /// Remove every key in this namespace. Keys owned by other consumers of
    /// the backend are left alone.
    ///
    /// Keys written between enumeration and deletion may survive.
    pub async fn clear(&self) {
        let keys = match self.namespace_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                self.record(StorageOp::Clear, None, e);
                return;
            }
        };

        if keys.is_empty() {
            debug!("clear: namespace {} already empty", self.prefix);
            return;
        }

        match self.backend.multi_remove(&keys).await {
            Ok(()) => debug!("clear: removed {} keys under {}", keys.len(), self.prefix),
            Err(e) => self.record(StorageOp::Clear, None, e),
        }
    }

    /// Physical keys currently stored under this namespace.
    pub async fn keys(&self) -> Vec<String> {
        match self.namespace_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                self.record(StorageOp::Keys, None, e);
                Vec::new()
            }
        }
    }

    /// Serialize `value` as JSON and store it.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match StoredValue::json(value) {
            Ok(v) => self.set_item(key, v).await,
            Err(e) => self.record(StorageOp::Set, Some(self.get_key_with_prefix(key)), e),
        }
    }

    /// Read a value and decode it as JSON. Undecodable values count as a
    /// failed read.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key).await?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                self.record(StorageOp::Get, Some(self.get_key_with_prefix(key)), e.into());
                None
            }
        }
    }

    /// Most recent swallowed failure, if any.
    pub fn last_error(&self) -> Option<StorageFailure> {
        self.last_error.lock().ok().and_then(|slot| slot.clone())
    }

    /// Return the most recent failure and reset the slot.
    pub fn take_last_error(&self) -> Option<StorageFailure> {
        self.last_error.lock().ok().and_then(|mut slot| slot.take())
    }

    async fn namespace_keys(&self) -> Result<Vec<String>, KVError> {
        let all = self.backend.get_all_keys().await?;
        Ok(all
            .into_iter()
            .filter(|k| k.starts_with(&self.prefix))
            .collect())
    }

    fn record(&self, op: StorageOp, key: Option<String>, error: KVError) {
        warn!(
            "{:?} failed for {}: {}",
            op,
            key.as_deref().unwrap_or(&self.prefix),
            error
        );

        let failure = StorageFailure { op, key, error };
        if let Some(observer) = &self.observer {
            observer(&failure);
        }
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = Some(failure);
        }
    }
}
