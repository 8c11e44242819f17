//! Typed access to the seeder's persisted state.

use std::fmt;

use anyhow::Result;
use seed_core::{
    AuthorIdentity, GenerationConfig, Mode, Pool, PoolKind, ProcessedLedger, SeederFile,
};
use tracing::info;

use crate::store::{get_or, set, Batch, ConfigStore};

/// Store keys used by [`SeederState`].
pub mod keys {
    use seed_core::PoolKind;

    pub const SETTINGS: &str = "settings";
    pub const AUTHORS: &str = "authors";
    pub const AUTHOR_CURSOR: &str = "cursor.author";
    pub const LEDGER: &str = "ledger";

    /// Key holding the templates of a pool.
    pub fn pool(kind: PoolKind) -> String {
        format!("pool.{}", kind.as_str())
    }

    /// Key holding the draw cursor of a pool.
    pub fn cursor(kind: PoolKind) -> String {
        format!("cursor.{}", kind.as_str())
    }
}

/// Outcome of importing a seeder file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub general_added: usize,
    pub buyer_added: usize,
    pub non_buyer_added: usize,
    pub authors: usize,
}

/// Snapshot of the stored state, for operators.
#[derive(Debug, Clone, PartialEq)]
pub struct StateStatus {
    pub settings: GenerationConfig,
    /// (kind, template count, cursor) per pool
    pub pools: Vec<(PoolKind, usize, u64)>,
    pub authors: usize,
    pub author_cursor: usize,
    pub processed_items: usize,
}

impl fmt::Display for StateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Mode: {:?}, content: {:?}, {} record(s) per item",
            self.settings.mode, self.settings.content_kind, self.settings.records_per_item
        )?;
        for (kind, len, cursor) in &self.pools {
            writeln!(f, "Pool {kind}: {len} template(s), cursor {cursor}")?;
        }
        writeln!(
            f,
            "Authors: {} (cursor {})",
            self.authors, self.author_cursor
        )?;
        write!(f, "Processed items: {}", self.processed_items)
    }
}

/// Typed accessors over a [`ConfigStore`].
///
/// Every method reads or writes the store directly; nothing is cached, so a
/// value written by one run is what the next run sees.
pub struct SeederState<'a> {
    store: &'a dyn ConfigStore,
}

impl<'a> SeederState<'a> {
    pub fn new(store: &'a dyn ConfigStore) -> Self {
        Self { store }
    }

    pub async fn settings(&self) -> Result<GenerationConfig> {
        get_or(self.store, keys::SETTINGS, GenerationConfig::default()).await
    }

    pub async fn save_settings(&self, settings: &GenerationConfig) -> Result<()> {
        set(self.store, keys::SETTINGS, settings).await
    }

    /// Drop the single-item override so later runs are not pinned to it.
    ///
    /// Single-item mode falls back to unrestricted once its target is gone.
    pub async fn clear_target_item(&self) -> Result<()> {
        let mut settings = self.settings().await?;
        if settings.target_item_id.take().is_some() {
            if settings.mode == Mode::SingleItem {
                settings.mode = Mode::Unrestricted;
            }
            self.save_settings(&settings).await?;
        }
        Ok(())
    }

    /// Load a pool with its persisted cursor.
    pub async fn pool(&self, kind: PoolKind) -> Result<Pool> {
        let items: Vec<String> = get_or(self.store, &keys::pool(kind), Vec::new()).await?;
        let cursor: u64 = get_or(self.store, &keys::cursor(kind), 0).await?;
        Ok(Pool::new(items, cursor))
    }

    pub async fn save_cursor(&self, kind: PoolKind, cursor: u64) -> Result<()> {
        set(self.store, &keys::cursor(kind), &cursor).await
    }

    /// Append templates to a stored pool, keeping prior entries and the cursor.
    ///
    /// Returns how many templates were added.
    pub async fn append_templates(&self, kind: PoolKind, templates: Vec<String>) -> Result<usize> {
        let mut pool = self.pool(kind).await?;
        let added = pool.extend(templates);
        if added > 0 {
            set(self.store, &keys::pool(kind), pool.items()).await?;
        }
        Ok(added)
    }

    pub async fn authors(&self) -> Result<Vec<AuthorIdentity>> {
        get_or(self.store, keys::AUTHORS, Vec::new()).await
    }

    pub async fn save_authors(&self, authors: &[AuthorIdentity]) -> Result<()> {
        set(self.store, keys::AUTHORS, authors).await
    }

    pub async fn author_cursor(&self) -> Result<usize> {
        get_or(self.store, keys::AUTHOR_CURSOR, 0).await
    }

    pub async fn save_author_cursor(&self, cursor: usize) -> Result<()> {
        set(self.store, keys::AUTHOR_CURSOR, &cursor).await
    }

    pub async fn ledger(&self) -> Result<ProcessedLedger> {
        get_or(self.store, keys::LEDGER, ProcessedLedger::new()).await
    }

    pub async fn save_ledger(&self, ledger: &ProcessedLedger) -> Result<()> {
        set(self.store, keys::LEDGER, ledger).await
    }

    /// Persist the progress of one completed item in a single write.
    ///
    /// Pool cursors and the ledger land together, so a failed save never
    /// leaves cursors advanced for an item the ledger does not record. The
    /// author cursor is included when `author_cursor` is set.
    pub async fn save_progress(
        &self,
        cursors: &[(PoolKind, u64)],
        ledger: &ProcessedLedger,
        author_cursor: Option<usize>,
    ) -> Result<()> {
        let mut batch = Batch::new();
        for (kind, cursor) in cursors {
            batch.set(&keys::cursor(*kind), cursor)?;
        }
        batch.set(keys::LEDGER, ledger)?;
        if let Some(cursor) = author_cursor {
            batch.set(keys::AUTHOR_CURSOR, &cursor)?;
        }
        batch.commit(self.store).await
    }

    /// Empty the processed ledger and restart every rotation.
    ///
    /// Idempotent: returns `false` and writes nothing when the ledger is
    /// already empty.
    pub async fn clear_ledger(&self) -> Result<bool> {
        let mut ledger = self.ledger().await?;
        let count = ledger.len();
        if !ledger.clear() {
            return Ok(false);
        }

        let mut batch = Batch::new();
        batch.set(keys::LEDGER, &ledger)?;
        for kind in PoolKind::ALL {
            batch.set(&keys::cursor(kind), &0u64)?;
        }
        batch.set(keys::AUTHOR_CURSOR, &0usize)?;
        batch.commit(self.store).await?;

        info!("Cleared {} processed item(s) from the ledger", count);
        Ok(true)
    }

    /// Import a seeder file.
    ///
    /// Settings and authors replace what is stored; templates are appended to
    /// the existing pools.
    pub async fn apply_seeder_file(&self, file: &SeederFile) -> Result<ImportSummary> {
        self.save_settings(&file.settings).await?;

        let authors = file.author_identities();
        self.save_authors(&authors).await?;

        let summary = ImportSummary {
            general_added: self
                .append_templates(PoolKind::General, file.templates.general.templates())
                .await?,
            buyer_added: self
                .append_templates(PoolKind::Buyer, file.templates.buyer.templates())
                .await?,
            non_buyer_added: self
                .append_templates(PoolKind::NonBuyer, file.templates.non_buyer.templates())
                .await?,
            authors: authors.len(),
        };

        info!(
            "Imported seeder file: {} general, {} buyer, {} non-buyer template(s), {} author(s)",
            summary.general_added, summary.buyer_added, summary.non_buyer_added, summary.authors
        );
        Ok(summary)
    }

    pub async fn status(&self) -> Result<StateStatus> {
        let mut pools = Vec::with_capacity(PoolKind::ALL.len());
        for kind in PoolKind::ALL {
            let pool = self.pool(kind).await?;
            pools.push((kind, pool.len(), pool.cursor()));
        }

        Ok(StateStatus {
            settings: self.settings().await?,
            pools,
            authors: self.authors().await?.len(),
            author_cursor: self.author_cursor().await?,
            processed_items: self.ledger().await?.len(),
        })
    }
}
