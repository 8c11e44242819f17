//! Engagement Seeder Library
//!
//! Seeds content items (articles, product pages) with synthetic comments and
//! reviews drawn from configured template pools and author identities.
//!
//! # Features
//!
//! - Fair rotation: every template is used once before any repeats
//! - Idempotent runs: a ledger keeps already-seeded items from being seeded again
//! - Resumable cursors: pool positions persist between runs
//! - Single-item override: force regeneration for one item, bypassing the ledger
//!
//! # Crates
//!
//! - `seed_core` - Pools, rotation, ledger, settings and report types
//! - `seed_generator` - Eligibility rules and record synthesis
//! - `seed_state` - Persisted settings, cursors and ledger behind `ConfigStore`
//! - `seed_jsonl` - JSONL content catalog and record sink
//!
//! # CLI Usage
//!
//! ```bash
//! # Import settings, templates and authors
//! engagement-seeder configure --file seeder.yaml
//!
//! # Seed up to 20 items from a catalog
//! engagement-seeder run --catalog items.jsonl --output records.jsonl --limit 20
//!
//! # Force regeneration for one item
//! engagement-seeder run --catalog items.jsonl --output records.jsonl --item-id 42
//!
//! # Allow every item to be seeded again
//! engagement-seeder clear-ledger
//! ```

use std::path::PathBuf;

use clap::Parser;
use seed_core::GenerationConfig;

pub mod collaborators;
pub mod orchestrator;

pub use collaborators::{ContentSource, DryRunSink, RecordSink};
pub use orchestrator::GenerationOrchestrator;

#[derive(Parser, Clone, Debug)]
pub struct StateOpts {
    /// Directory holding the persisted settings, cursors and ledger
    #[arg(long, default_value = ".seeder-state", env = "SEEDER_STATE_DIR")]
    pub state_dir: PathBuf,
}

/// Per-run overrides layered over the stored settings.
#[derive(Parser, Clone, Debug, Default)]
pub struct RunOverrides {
    /// Seed this item only, even if it was seeded before
    #[arg(long)]
    pub item_id: Option<u64>,

    /// Restrict candidates to a category
    #[arg(long, conflicts_with = "item_id")]
    pub category: Option<u64>,

    /// Max items considered this run
    #[arg(long)]
    pub limit: Option<usize>,

    /// Records generated per item
    #[arg(long)]
    pub records_per_item: Option<u32>,
}

impl RunOverrides {
    /// Apply the overrides to a settings snapshot.
    pub fn apply(&self, mut settings: GenerationConfig) -> GenerationConfig {
        if let Some(item_id) = self.item_id {
            settings = settings.single_item(item_id);
        }
        if let Some(category) = self.category {
            settings = settings.by_category(category);
        }
        if let Some(limit) = self.limit {
            settings.item_limit = limit;
        }
        if let Some(records_per_item) = self.records_per_item {
            settings.records_per_item = records_per_item;
        }
        settings
    }
}
