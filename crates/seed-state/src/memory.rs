//! In-memory store implementation.

use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::store::ConfigStore;

/// Store that keeps every key in memory.
///
/// Nothing survives the process; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of keys, e.g. a copy of another store.
    pub fn with_values(values: BTreeMap<String, serde_json::Value>) -> Self {
        Self {
            values: Mutex::new(values),
        }
    }

    /// Copy of every stored key and value.
    pub fn snapshot(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(values.clone())
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get_value(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set_value(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    async fn set_values(&self, batch: Vec<(String, serde_json::Value)>) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        values.extend(batch);
        Ok(())
    }
}
