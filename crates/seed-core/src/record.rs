//! Generated records and the per-run report.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pool::AuthorIdentity;
use crate::ItemId;

/// Moderation state assigned to every generated record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approval {
    #[default]
    Approved,
    Pending,
    Spam,
}

/// One synthetic comment or review, ready for the record sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecord {
    pub item_id: ItemId,
    pub author: AuthorIdentity,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub approval: Approval,

    /// Star score, reviewable content only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,

    /// Drawn from the buyer pool, reviewable content only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_purchase: Option<bool>,
}

/// Why a run stopped short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum RunFailure {
    /// Rejected before any item was processed
    Precondition(String),
    /// A fault after the run started; progress made so far is kept
    Interrupted(String),
}

/// Summary of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Items that received at least one record this run
    pub items_seeded: u64,
    /// Candidates skipped because the ledger already had them
    pub items_already_processed: u64,
    /// Synthesized records submitted to the sink (attempts, not confirmations)
    pub records_created: u64,
    /// Submissions the sink reported as failed
    pub sink_failures: u64,
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<RunFailure>,
}

impl RunReport {
    /// Report for a run rejected before it started.
    pub fn precondition_failed(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(RunFailure::Precondition(reason.into())),
            ..Default::default()
        }
    }

    /// Recompute `succeeded` from the counters.
    pub fn finish(mut self) -> Self {
        self.succeeded = self.items_seeded > 0;
        self
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(RunFailure::Precondition(reason)) = &self.failure {
            return write!(f, "Generation not started: {reason}");
        }

        if self.succeeded {
            write!(
                f,
                "Seeded {} item(s) with {} record(s)",
                self.items_seeded, self.records_created
            )?;
        } else {
            write!(f, "No items were seeded")?;
        }

        if self.items_already_processed > 0 {
            write!(
                f,
                "; {} item(s) already processed",
                self.items_already_processed
            )?;
        }
        if self.sink_failures > 0 {
            write!(f, "; {} insert(s) failed", self.sink_failures)?;
        }
        if let Some(RunFailure::Interrupted(reason)) = &self.failure {
            write!(f, "; interrupted: {reason}")?;
        }

        Ok(())
    }
}
