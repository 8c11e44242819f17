//! Append-only JSONL record sink.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use seed_core::{GeneratedRecord, RecordId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::JsonlError;

/// A record as written to the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: GeneratedRecord,
}

/// Sink that appends each record as one JSON line.
///
/// Record ids continue from the number of lines already in the file, so
/// reopening the same output keeps ids unique.
pub struct JsonlRecordSink {
    path: PathBuf,
    next_id: AtomicU64,
}

impl JsonlRecordSink {
    /// Open (or prepare to create) the output file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, JsonlError> {
        let path = path.as_ref().to_path_buf();

        let existing = if path.exists() {
            BufReader::new(File::open(&path)?)
                .lines()
                .filter(|line| line.as_ref().map(|l| !l.trim().is_empty()).unwrap_or(true))
                .count() as u64
        } else {
            0
        };

        info!(
            "Writing records to '{}' ({} existing)",
            path.display(),
            existing
        );

        Ok(Self {
            path,
            next_id: AtomicU64::new(existing + 1),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `record` and return its id.
    pub fn append(&self, record: &GeneratedRecord) -> Result<RecordId, JsonlError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = StoredRecord {
            id,
            record: record.clone(),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut line = serde_json::to_vec(&stored)?;
        line.push(b'\n');
        file.write_all(&line)?;

        debug!("Appended record {} for item {}", id, record.item_id);
        Ok(id)
    }
}
