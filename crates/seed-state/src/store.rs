//! Key/value store trait backing the seeder configuration and state.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Trait for configuration storage operations.
///
/// This trait abstracts the storage backend so the same state logic works
/// with:
/// - Filesystem storage (`FilesystemStore`)
/// - In-memory storage (`MemoryStore`)
///
/// Values are JSON; typed access goes through [`get_or`] and [`set`].
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read a value. Returns None if the key was never set.
    async fn get_value(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Write a value, replacing any previous one.
    async fn set_value(&self, key: &str, value: serde_json::Value) -> Result<()>;

    /// Write several values at once.
    ///
    /// Either every value is stored or none is; readers never observe a
    /// partially applied batch.
    async fn set_values(&self, values: Vec<(String, serde_json::Value)>) -> Result<()>;
}

/// Read `key` as `T`, falling back to `default` when the key is unset.
pub async fn get_or<T: DeserializeOwned>(
    store: &dyn ConfigStore,
    key: &str,
    default: T,
) -> Result<T> {
    match store.get_value(key).await? {
        Some(value) => serde_json::from_value(value)
            .with_context(|| format!("Invalid value stored under '{key}'")),
        None => Ok(default),
    }
}

/// Serialize `value` and store it under `key`.
pub async fn set<T: Serialize + ?Sized>(
    store: &dyn ConfigStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let value = serde_json::to_value(value)
        .with_context(|| format!("Failed to serialize value for '{key}'"))?;
    store.set_value(key, value).await
}

/// Typed values collected for a single [`ConfigStore::set_values`] call.
#[derive(Debug, Default)]
pub struct Batch {
    values: Vec<(String, serde_json::Value)>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `value` and queue it under `key`.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .with_context(|| format!("Failed to serialize value for '{key}'"))?;
        self.values.push((key.to_string(), value));
        Ok(())
    }

    /// Store every queued value in one write.
    pub async fn commit(self, store: &dyn ConfigStore) -> Result<()> {
        store.set_values(self.values).await
    }
}
