//! Top-level driver for a generation run.
//!
//! A run loads the settings snapshot and rotation state, checks that records
//! can be produced at all, asks the content source for candidates, and seeds
//! every eligible candidate with `records_per_item` records.
//!
//! State is flushed once per completed item, in a single store write: pool
//! cursors, the ledger and (when configured) the author cursor. A crash
//! mid-item therefore never marks the item processed, though some of its
//! records may already be in the sink. An item only counts as seeded once
//! that write succeeds.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use seed_core::{
    AuthorRotation, ContentQuery, GenerationConfig, PoolKind, PreconditionError,
    ProcessedLedger, RunFailure, RunReport,
};
use seed_generator::{is_eligible, RecordSynthesizer, TemplateSource};
use seed_state::{ConfigStore, SeederState};
use tracing::{debug, info, warn};

use crate::collaborators::{ContentSource, RecordSink};
use crate::RunOverrides;

/// Rotation state owned by a run.
struct RunState {
    templates: TemplateSource,
    authors: AuthorRotation,
    ledger: ProcessedLedger,
}

/// Drives generation runs against a store, a content source and a sink.
///
/// Runs must not overlap for the same store: cursors and the ledger are
/// read at the start and written back as items complete.
pub struct GenerationOrchestrator<'a> {
    store: &'a dyn ConfigStore,
    source: &'a dyn ContentSource,
    sink: &'a dyn RecordSink,
    now: Option<DateTime<Utc>>,
}

impl<'a> GenerationOrchestrator<'a> {
    pub fn new(
        store: &'a dyn ConfigStore,
        source: &'a dyn ContentSource,
        sink: &'a dyn RecordSink,
    ) -> Self {
        Self {
            store,
            source,
            sink,
            now: None,
        }
    }

    /// Pin the reference instant timestamps are generated against.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Run with the settings currently in the store.
    pub async fn run(&self) -> RunReport {
        self.run_with_overrides(&RunOverrides::default()).await
    }

    /// Run with the stored settings adjusted by per-run overrides.
    ///
    /// Overrides only shape this run; they are never written to the store.
    pub async fn run_with_overrides(&self, overrides: &RunOverrides) -> RunReport {
        match SeederState::new(self.store).settings().await {
            Ok(config) => self.run_with(&overrides.apply(config)).await,
            Err(e) => {
                warn!("Failed to load generation settings: {e:#}");
                RunReport::precondition_failed(format!("failed to load settings: {e:#}"))
            }
        }
    }

    /// Run with an explicit settings snapshot.
    ///
    /// Never fails: every exit path yields a report, and whatever was seeded
    /// before a fault stays seeded.
    pub async fn run_with(&self, config: &GenerationConfig) -> RunReport {
        let mut run = match self.prepare(config).await {
            Ok(Ok(run)) => run,
            Ok(Err(precondition)) => {
                warn!("Generation not started: {precondition}");
                return RunReport::precondition_failed(precondition.to_string());
            }
            Err(e) => {
                warn!("Generation not started: {e:#}");
                return RunReport::precondition_failed(format!("{e:#}"));
            }
        };

        let mut report = RunReport::default();
        if let Err(e) = self.seed(config, &mut run, &mut report).await {
            warn!("Generation interrupted: {e:#}");
            report.failure = Some(RunFailure::Interrupted(format!("{e:#}")));
        }

        let report = report.finish();
        info!(
            items_seeded = report.items_seeded,
            items_already_processed = report.items_already_processed,
            records_created = report.records_created,
            sink_failures = report.sink_failures,
            "Generation run finished"
        );
        report
    }

    /// Load rotation state and check the run can produce records.
    async fn prepare(
        &self,
        config: &GenerationConfig,
    ) -> Result<std::result::Result<RunState, PreconditionError>> {
        if let Err(e) = config.validate() {
            return Ok(Err(e));
        }

        let state = SeederState::new(self.store);

        let authors = state.authors().await.context("failed to load authors")?;
        if authors.is_empty() {
            return Ok(Err(PreconditionError::NoAuthors));
        }
        let author_cursor = if config.persist_author_cursor {
            state.author_cursor().await?
        } else {
            0
        };

        let templates = match TemplateSource::validated(
            config,
            state.pool(PoolKind::General).await?,
            state.pool(PoolKind::Buyer).await?,
            state.pool(PoolKind::NonBuyer).await?,
        ) {
            Ok(templates) => templates,
            Err(e) => return Ok(Err(e)),
        };

        let ledger = state.ledger().await.context("failed to load ledger")?;

        Ok(Ok(RunState {
            templates,
            authors: AuthorRotation::new(authors, author_cursor),
            ledger,
        }))
    }

    async fn seed(
        &self,
        config: &GenerationConfig,
        run: &mut RunState,
        report: &mut RunReport,
    ) -> Result<()> {
        let state = SeederState::new(self.store);

        let query = ContentQuery::from(config);
        let candidates = self
            .source
            .query(&query)
            .await
            .context("content query failed")?;
        info!(
            "Found {} candidate item(s) ({:?} mode)",
            candidates.len(),
            config.mode
        );

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut synthesizer = RecordSynthesizer::new(rng, self.now.unwrap_or_else(Utc::now));

        for item_id in candidates {
            if !is_eligible(item_id, &run.ledger, config) {
                debug!("Item {} already processed, skipping", item_id);
                report.items_already_processed += 1;
                continue;
            }

            for _ in 0..config.records_per_item {
                let record = synthesizer.synthesize(
                    item_id,
                    config,
                    &mut run.templates,
                    &mut run.authors,
                )?;
                report.records_created += 1;

                if let Err(e) = self.sink.insert(&record).await {
                    report.sink_failures += 1;
                    warn!("Failed to insert record for item {item_id}: {e:#}");
                }
            }

            run.ledger.mark(item_id);
            self.flush(&state, config, run)
                .await
                .with_context(|| format!("failed to persist state after item {item_id}"))?;
            report.items_seeded += 1;
        }

        state
            .clear_target_item()
            .await
            .context("failed to clear single-item override")?;
        Ok(())
    }

    /// Persist cursors and the ledger at an item boundary, in one write.
    async fn flush(
        &self,
        state: &SeederState<'_>,
        config: &GenerationConfig,
        run: &RunState,
    ) -> Result<()> {
        let cursors: Vec<(PoolKind, u64)> = run
            .templates
            .pools()
            .into_iter()
            .map(|(kind, pool)| (kind, pool.cursor()))
            .collect();
        let author_cursor = config
            .persist_author_cursor
            .then_some(run.authors.cursor());
        state
            .save_progress(&cursors, &run.ledger, author_cursor)
            .await
    }
}
