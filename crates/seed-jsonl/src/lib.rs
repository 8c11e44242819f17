//! JSONL (JSON Lines) collaborators for engagement-seeder.
//!
//! - [`JsonlContentSource`] reads a catalog of content items, one JSON object
//!   per line, and answers candidate queries in file order.
//! - [`JsonlRecordSink`] appends generated records to a JSONL file and hands
//!   out sequential record ids.
//!
//! # Example
//!
//! ```ignore
//! use seed_jsonl::{JsonlContentSource, JsonlRecordSink};
//! use seed_core::{ContentQuery, GenerationConfig};
//!
//! let source = JsonlContentSource::open("items.jsonl")?;
//! let ids = source.query(&ContentQuery::from(&GenerationConfig::default()));
//!
//! let sink = JsonlRecordSink::open("records.jsonl")?;
//! let id = sink.append(&record)?;
//! ```

pub mod catalog;
pub mod error;
pub mod sink;

pub use catalog::{CatalogItem, CatalogKind, JsonlContentSource};
pub use error::JsonlError;
pub use sink::{JsonlRecordSink, StoredRecord};
