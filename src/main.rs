//! Command-line interface for engagement-seeder
//!
//! # Usage Examples
//!
//! ## Configure
//! ```bash
//! # Import settings, append templates, replace authors
//! engagement-seeder configure --file seeder.yaml
//! ```
//!
//! ## Run
//! ```bash
//! # Seed items from a JSONL catalog, appending records to a JSONL file
//! engagement-seeder run --catalog items.jsonl --output records.jsonl
//!
//! # Only products in category 7, three reviews each
//! engagement-seeder run --catalog items.jsonl --output records.jsonl \
//!   --category 7 --records-per-item 3
//!
//! # Preview without writing records
//! engagement-seeder run --catalog items.jsonl --dry-run
//! ```
//!
//! ## Maintenance
//! ```bash
//! engagement-seeder status
//! engagement-seeder clear-ledger
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use engagement_seeder::{DryRunSink, GenerationOrchestrator, RecordSink, RunOverrides, StateOpts};
use seed_core::SeederFile;
use seed_jsonl::{JsonlContentSource, JsonlRecordSink};
use seed_state::{ConfigStore, FilesystemStore, MemoryStore, SeederState};

#[derive(Parser)]
#[command(name = "engagement-seeder")]
#[command(about = "Seed content items with synthetic comments and reviews")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    state: StateOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a seeder file (settings, templates, authors)
    Configure {
        /// Path to the seeder YAML file
        #[arg(long, short = 'f', value_name = "PATH")]
        file: PathBuf,
    },

    /// Generate records for eligible items
    Run {
        /// JSONL catalog of content items
        #[arg(long, value_name = "PATH", env = "SEEDER_CATALOG")]
        catalog: PathBuf,

        /// JSONL file generated records are appended to
        #[arg(long, value_name = "PATH", required_unless_present = "dry_run")]
        output: Option<PathBuf>,

        /// Log records instead of writing them; stored state is left untouched
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        overrides: RunOverrides,
    },

    /// Forget which items were seeded so they become eligible again
    ClearLedger,

    /// Show stored settings, pools, cursors and ledger size
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = FilesystemStore::new(&cli.state.state_dir);
    let state = SeederState::new(&store);

    match cli.command {
        Commands::Configure { file } => {
            let seeder_file = SeederFile::from_file(&file)
                .with_context(|| format!("Failed to load seeder file {}", file.display()))?;
            let summary = state.apply_seeder_file(&seeder_file).await?;
            println!(
                "Added {} general, {} buyer, {} non-buyer template(s); {} author(s) configured",
                summary.general_added,
                summary.buyer_added,
                summary.non_buyer_added,
                summary.authors
            );
        }

        Commands::Run {
            catalog,
            output,
            dry_run,
            overrides,
        } => {
            let source = JsonlContentSource::open(&catalog)
                .with_context(|| format!("Failed to load catalog {}", catalog.display()))?;

            let sink: Box<dyn RecordSink> = match (dry_run, output) {
                (false, Some(output)) => Box::new(
                    JsonlRecordSink::open(&output)
                        .with_context(|| format!("Failed to open output {}", output.display()))?,
                ),
                _ => Box::new(DryRunSink::new()),
            };

            // Dry runs advance a throwaway copy of the state
            let preview;
            let run_store: &dyn ConfigStore = if dry_run {
                preview = MemoryStore::with_values(store.snapshot()?);
                &preview
            } else {
                &store
            };

            let report = GenerationOrchestrator::new(run_store, &source, &*sink)
                .run_with_overrides(&overrides)
                .await;

            println!("{report}");
            if report.failure.is_some() {
                std::process::exit(2);
            }
        }

        Commands::ClearLedger => {
            if state.clear_ledger().await? {
                println!("Ledger cleared; all items are eligible again");
            } else {
                println!("Ledger already empty; nothing to clear");
            }
        }

        Commands::Status => {
            println!("{}", state.status().await?);
        }
    }

    Ok(())
}
