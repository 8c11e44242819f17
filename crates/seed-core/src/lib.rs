//! Core types for the engagement-seeder generation engine.
//!
//! This crate provides the foundational types shared by the generator,
//! the state store and the orchestrator:
//!
//! - [`Pool`] - Ordered template collection with a cyclic draw cursor
//! - [`AuthorRotation`] - Round-robin over configured [`AuthorIdentity`] entries
//! - [`ProcessedLedger`] - Items that already received generated records
//! - [`GenerationConfig`] - Immutable per-run settings snapshot
//! - [`ContentQuery`] - Candidate selection handed to a content source
//! - [`GeneratedRecord`] / [`RunReport`] - Output units of a run
//! - [`SeederFile`] - YAML document used to configure a seeder
//!
//! # Architecture
//!
//! ```text
//! seed-core (this crate)
//!    │
//!    ├─── seed-generator  (eligibility + record synthesis)
//!    ├─── seed-state      (ConfigStore, persisted cursors and ledger)
//!    └─── seed-jsonl      (file-backed content source and record sink)
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod pool;
pub mod query;
pub mod record;

pub use config::{
    ContentKind, GenerationConfig, Mode, ReviewSource, SeederFile, StockStatus, TemplateBlock,
    TemplateLists,
};
pub use error::{PreconditionError, SeedError};
pub use ledger::ProcessedLedger;
pub use pool::{
    parse_author_lines, parse_template_lines, AuthorIdentity, AuthorRotation, Pool, PoolKind,
};
pub use query::ContentQuery;
pub use record::{Approval, GeneratedRecord, RunFailure, RunReport};

/// Identifier of a content item (article, product page, ...).
pub type ItemId = u64;

/// Identifier returned by a record sink for an inserted record.
pub type RecordId = u64;

/// Highest score a reviewable record can carry.
pub const MAX_SCORE: u8 = 5;
