//! Persisted state for engagement-seeder
//!
//! Provides storage-agnostic persistence for everything that must survive
//! between runs: generation settings, template pools and their cursors, the
//! author list, and the processed-item ledger.
//!
//! # Architecture
//!
//! This crate provides:
//! - The `ConfigStore` trait, a key/value backing store (`get(key, default)`,
//!   `set(key, value)`)
//! - `SeederState`, typed accessors over a `ConfigStore`
//! - The ledger clear operation and additive template import
//!
//! ## Storage Backends
//!
//! - `FilesystemStore` - Stores all keys in one JSON document on disk
//! - `MemoryStore` - Keeps keys in memory (tests, dry runs)

mod filesystem;
mod memory;
pub mod state;
pub mod store;


pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;
pub use state::{keys, ImportSummary, SeederState, StateStatus};
pub use store::{get_or, set, Batch, ConfigStore};
