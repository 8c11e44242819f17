//! Ledger of content items that already received generated records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Durable set of processed item ids.
///
/// Grows through [`mark`](ProcessedLedger::mark) only; the explicit clear
/// operation is the single way to shrink it. Serialized as a sorted list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessedLedger {
    processed_ids: BTreeSet<ItemId>,
}

impl ProcessedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.processed_ids.contains(&id)
    }

    /// Record `id` as processed. Returns `false` if it was already present.
    pub fn mark(&mut self, id: ItemId) -> bool {
        self.processed_ids.insert(id)
    }

    /// Empty the ledger. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_entries = !self.processed_ids.is_empty();
        self.processed_ids.clear();
        had_entries
    }

    pub fn len(&self) -> usize {
        self.processed_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processed_ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.processed_ids.iter().copied()
    }
}

impl FromIterator<ItemId> for ProcessedLedger {
    fn from_iter<T: IntoIterator<Item = ItemId>>(iter: T) -> Self {
        Self {
            processed_ids: iter.into_iter().collect(),
        }
    }
}
