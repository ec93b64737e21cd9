use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};

use crate::error::KVError;
use crate::traits::AsyncStorage;

const TABLE: TableDefinition<&str, &str> = TableDefinition::new("kv");

fn storage_err(e: impl std::fmt::Display) -> KVError {
    KVError::Storage(e.to_string())
}

/// RedbStorage is an AsyncStorage backed by redb, a pure-Rust embedded
/// key-value database. Every call is a single redb transaction executed on
/// tokio's blocking pool, so it must be used from within a tokio runtime.
#[derive(Clone)]
pub struct RedbStorage {
    db: Arc<Database>,
}

impl RedbStorage {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(storage_err)?;

        // Ensure the table exists so reads on a fresh file don't fail.
        let write_txn = db.begin_write().map_err(storage_err)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;

        Ok(Self { db: Arc::new(db) })
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, KVError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, KVError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| KVError::Storage(format!("blocking task failed: {}", e)))?
    }
}

#[async_trait]
impl AsyncStorage for RedbStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KVError> {
        let key = key.to_string();
        self.blocking(move |db| {
            let read_txn = db.begin_read().map_err(storage_err)?;
            let table = read_txn.open_table(TABLE).map_err(storage_err)?;
            let value = table
                .get(key.as_str())
                .map_err(storage_err)?
                .map(|v| v.value().to_string());
            Ok(value)
        })
        .await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), KVError> {
        let key = key.to_string();
        let value = value.to_string();
        self.blocking(move |db| {
            let write_txn = db.begin_write().map_err(storage_err)?;
            {
                let mut table = write_txn.open_table(TABLE).map_err(storage_err)?;
                table
                    .insert(key.as_str(), value.as_str())
                    .map_err(storage_err)?;
            }
            write_txn.commit().map_err(storage_err)
        })
        .await
    }

    async fn remove_item(&self, key: &str) -> Result<(), KVError> {
        let key = key.to_string();
        self.blocking(move |db| {
            let write_txn = db.begin_write().map_err(storage_err)?;
            {
                let mut table = write_txn.open_table(TABLE).map_err(storage_err)?;
                table.remove(key.as_str()).map_err(storage_err)?;
            }
            write_txn.commit().map_err(storage_err)
        })
        .await
    }

    async fn get_all_keys(&self) -> Result<Vec<String>, KVError> {
        self.blocking(|db| {
            let read_txn = db.begin_read().map_err(storage_err)?;
            let table = read_txn.open_table(TABLE).map_err(storage_err)?;

            let mut keys = Vec::new();
            for entry in table.iter().map_err(storage_err)? {
                let (key, _) = entry.map_err(storage_err)?;
                keys.push(key.value().to_string());
            }
            Ok(keys)
        })
        .await
    }

    async fn multi_remove(&self, keys: &[String]) -> Result<(), KVError> {
        let keys = keys.to_vec();
        self.blocking(move |db| {
            // One transaction: either every key is gone or none are.
            let write_txn = db.begin_write().map_err(storage_err)?;
            {
                let mut table = write_txn.open_table(TABLE).map_err(storage_err)?;
                for key in &keys {
                    table.remove(key.as_str()).map_err(storage_err)?;
                }
            }
            write_txn.commit().map_err(storage_err)
        })
        .await
    }
}
