//! Local key-value store
//!
//! Every value is kept as JSON text, strings included, so whatever `set`
//! wrote `get` reads back unchanged. Text that is not JSON (edited by hand or
//! written by another tool) reads as a plain string.
//!
//! Each key is either absent or present; `set` makes it present and `remove`
//! makes it absent.
//!
//! The `try_*` methods report failures. `get`/`set`/`remove` never do: a failed
//! write is logged and dropped, and a failed read is indistinguishable from a
//! missing key. Callers that need to know should use the `try_*` variants.

use super::Result;
use super::backend::KeyValueBackend;
use crate::error::StorageError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn KeyValueBackend>,
}

impl LocalStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// Store `value` under `key` as JSON text.
    pub async fn try_set<V>(&self, key: &str, value: &V) -> Result<()>
    where
        V: Serialize + ?Sized,
    {
        let encoded = encode(key, value)?;
        self.backend.write(key, encoded).await
    }

    /// Read `key` as `T`. `Ok(None)` means the key was never written.
    pub async fn try_get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.backend.read(key).await? {
            Some(stored) => decode(key, stored).map(Some),
            None => Ok(None),
        }
    }

    /// Delete `key`. `Ok(false)` means it was already absent.
    pub async fn try_remove(&self, key: &str) -> Result<bool> {
        self.backend.remove(key).await
    }

    /// Never-failing write; errors are logged and the write is skipped.
    pub async fn set<V>(&self, key: &str, value: &V)
    where
        V: Serialize + ?Sized,
    {
        if let Err(e) = self.try_set(key, value).await {
            log::warn!("Failed to store '{}': {}", key, e);
        }
    }

    /// Never-failing read; errors are logged and reported as `None`.
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.try_get(key).await.unwrap_or_else(|e| {
            log::warn!("Failed to read '{}': {}", key, e);
            None
        })
    }

    /// Never-failing delete
    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.try_remove(key).await {
            log::warn!("Failed to remove '{}': {}", key, e);
        }
    }
}

fn encode<V>(key: &str, value: &V) -> Result<String>
where
    V: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(|e| StorageError::Serialize {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn decode<T>(key: &str, stored: String) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = serde_json::from_str::<Value>(&stored).unwrap_or(Value::String(stored));

    serde_json::from_value(value).map_err(|e| StorageError::Corrupt {
        key: key.to_string(),
        message: e.to_string(),
    })
}
