//! Record synthesis for the engagement-seeder generation engine.
//!
//! This crate turns rotation state into [`GeneratedRecord`]s. Template and
//! author selection is deterministic round-robin; scores, timestamps and the
//! buyer/non-buyer coin flip come from a caller-supplied RNG, so a seeded
//! `StdRng` reproduces a run exactly.
//!
//! # Architecture
//!
//! ```text
//! GenerationConfig + stored pools
//!        │
//!        ▼
//! ┌────────────────────┐
//! │  TemplateSource    │  (validated once per run)
//! └─────────┬──────────┘
//!           │
//!           ▼
//! ┌────────────────────┐      ┌────────────────┐
//! │  RecordSynthesizer │ ◄─── │ AuthorRotation │
//! │  - rng             │      └────────────────┘
//! │  - now             │
//! └─────────┬──────────┘
//!           │
//!           ▼
//!    GeneratedRecord { item_id, author, body, created_at, score, ... }
//! ```
//!
//! [`GeneratedRecord`]: seed_core::GeneratedRecord

pub mod eligibility;
pub mod generators;
pub mod synthesizer;

pub use eligibility::is_eligible;
pub use synthesizer::{RecordSynthesizer, SynthesisError, TemplateSource};
