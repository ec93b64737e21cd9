pub mod config;
pub mod error;
pub mod memory;
pub mod namespaced;
pub mod redb_store;
pub mod traits;
pub mod value;

pub use config::{DEFAULT_PREFIX, StoreConfig};
pub use error::KVError;
pub use memory::MemoryStorage;
pub use namespaced::{FailureObserver, NamespacedStore, StorageFailure, StorageOp, sanitize_key};
pub use redb_store::RedbStorage;
pub use traits::AsyncStorage;
pub use value::StoredValue;
