//! Filesystem-based store implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use crate::store::ConfigStore;

/// File name of the state document inside the store directory.
pub const STATE_FILE_NAME: &str = "seeder-state.json";

/// Filesystem implementation of the ConfigStore trait.
///
/// Stores all keys in a single pretty-printed JSON document. Writes go to a
/// temporary file that is renamed over the document, so a crash leaves
/// either the old or the new state, never a torn file.
pub struct FilesystemStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FilesystemStore {
    /// Create a new FilesystemStore with the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Get the directory path.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Path of the state document.
    pub fn path(&self) -> PathBuf {
        self.dir.join(STATE_FILE_NAME)
    }

    /// Every stored key and value.
    pub fn snapshot(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        self.read_document()
    }

    fn read_document(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        let path = self.path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file {}", path.display()))
    }

    fn write_document(&self, document: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path();
        let tmp = temp_path(&path);
        std::fs::write(&tmp, serde_json::to_string_pretty(document)?)?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace state file {}", path.display()))?;
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[async_trait]
impl ConfigStore for FilesystemStore {
    async fn get_value(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.read_document()?.remove(key))
    }

    async fn set_value(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("state file lock poisoned"))?;

        let mut document = self.read_document()?;
        document.insert(key.to_string(), value);
        self.write_document(&document)?;

        tracing::debug!("Stored '{}' in {}", key, self.path().display());
        Ok(())
    }

    async fn set_values(&self, values: Vec<(String, serde_json::Value)>) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("state file lock poisoned"))?;

        let count = values.len();
        let mut document = self.read_document()?;
        document.extend(values);
        self.write_document(&document)?;

        tracing::debug!("Stored {} key(s) in {}", count, self.path().display());
        Ok(())
    }
}
