use serde::Serialize;

use crate::error::KVError;

/// A value handed to [`NamespacedStore::set_item`].
///
/// Strings are persisted verbatim. Anything else is JSON-encoded, and the
/// reader is responsible for decoding it again.
///
/// [`NamespacedStore::set_item`]: crate::NamespacedStore::set_item
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Text(String),
    Json(serde_json::Value),
}

impl StoredValue {
    /// Encode any serializable value as structured data.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, KVError> {
        Ok(StoredValue::Json(serde_json::to_value(value)?))
    }

    /// The string that ends up in the backend.
    pub fn into_stored_string(self) -> Result<String, KVError> {
        match self {
            StoredValue::Text(s) => Ok(s),
            StoredValue::Json(v) => Ok(serde_json::to_string(&v)?),
        }
    }
}

impl From<&str> for StoredValue {
    fn from(s: &str) -> Self {
        StoredValue::Text(s.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(s: String) -> Self {
        StoredValue::Text(s)
    }
}

impl From<&String> for StoredValue {
    fn from(s: &String) -> Self {
        StoredValue::Text(s.clone())
    }
}

impl From<serde_json::Value> for StoredValue {
    fn from(v: serde_json::Value) -> Self {
        StoredValue::Json(v)
    }
}

macro_rules! json_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for StoredValue {
                fn from(v: $t) -> Self {
                    StoredValue::Json(serde_json::Value::from(v))
                }
            }
        )*
    };
}

json_scalar!(bool, i32, i64, u32, u64, f64);
