//! Content source and record sink seams used by the orchestrator.
//!
//! The generation engine only sees these two traits. File-backed
//! implementations come from `seed-jsonl`; [`DryRunSink`] accepts records
//! without storing them.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use seed_core::{ContentQuery, GeneratedRecord, ItemId, RecordId};
use seed_jsonl::{JsonlContentSource, JsonlRecordSink};

/// Lists candidate items for a run.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Item ids matching `query`, in the order they should be processed.
    async fn query(&self, query: &ContentQuery) -> Result<Vec<ItemId>>;
}

/// Durably stores generated records.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Store `record` and return its identifier.
    async fn insert(&self, record: &GeneratedRecord) -> Result<RecordId>;
}

#[async_trait]
impl ContentSource for JsonlContentSource {
    async fn query(&self, query: &ContentQuery) -> Result<Vec<ItemId>> {
        Ok(JsonlContentSource::query(self, query))
    }
}

#[async_trait]
impl RecordSink for JsonlRecordSink {
    async fn insert(&self, record: &GeneratedRecord) -> Result<RecordId> {
        Ok(self.append(record)?)
    }
}

/// Sink that logs records instead of storing them.
#[derive(Debug, Default)]
pub struct DryRunSink {
    accepted: AtomicU64,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records accepted so far.
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSink for DryRunSink {
    async fn insert(&self, record: &GeneratedRecord) -> Result<RecordId> {
        let id = self.accepted.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            "[dry run] record {} for item {} by {}: {}",
            id,
            record.item_id,
            record.author.display_name,
            record.body
        );
        Ok(id)
    }
}
