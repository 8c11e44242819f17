//! Decides whether a content item receives records this run.

use seed_core::{GenerationConfig, ItemId, ProcessedLedger};

/// Whether `item_id` should be seeded.
///
/// The target of a single-item override always wins, even when it is already
/// in the ledger. Every other item is eligible only if the ledger has never
/// seen it.
pub fn is_eligible(item_id: ItemId, ledger: &ProcessedLedger, config: &GenerationConfig) -> bool {
    config.override_target() == Some(item_id) || !ledger.contains(item_id)
}
