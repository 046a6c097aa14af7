//! trailhead-sync binary.
//!
//! Reads `trailhead.toml` (or the path given with `--config`) plus
//! `TRAILHEAD_*` environment variables, opens the SQLite store, and runs one
//! sync pass over the selected partitions.
//!
//! ```
//! TRAILHEAD_API_KEY=... trailhead-sync --partition CA --partition NV
//! ```
//!
//! Exits non-zero if any partition failed.

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use trailhead_nps::NpsClient;
use trailhead_store_sqlite::SqliteStore;
use trailhead_sync::{Error, SyncConfig, Syncer, select_partitions};

#[derive(Parser)]
#[command(author, version, about = "Sync the park catalog into SQLite")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "trailhead.toml")]
  config: PathBuf,

  /// Only sync this partition (repeatable). Defaults to every partition.
  #[arg(short, long = "partition", value_name = "CODE")]
  partitions: Vec<String>,

  /// Print the run report as JSON on stdout.
  #[arg(long)]
  json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = SyncConfig::load(&cli.config).context("failed to read configuration")?;
  let partitions = select_partitions(&cli.partitions)?;

  // Opening the store creates the schema; nothing is fetched if that fails.
  let store_path = cfg.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let client = NpsClient::new(cfg.nps_config()).context("failed to build provider client")?;
  let syncer = Syncer::new(client, store.clone(), cfg.sync_options());

  let report = match syncer.run(&partitions).await {
    Ok(report) => report,
    Err(err) => {
      if let Error::StoreUnavailable { completed, .. } = &err {
        for done in completed {
          tracing::info!(partition = %done.partition, parks = done.parks_written, "committed before abort");
        }
        if cli.json {
          println!("{}", serde_json::to_string_pretty(completed)?);
        }
      }
      return Err(err).context("sync aborted");
    }
  };

  let counts = store.table_counts().await.context("failed to count rows")?;
  tracing::info!(?counts, "store totals");
  let violations = store
    .foreign_key_violations()
    .await
    .context("failed to check foreign keys")?;
  if violations > 0 {
    tracing::warn!(violations, "store has rows referencing missing parents");
  }

  for failed in report.failed() {
    tracing::warn!(partition = %failed.partition, outcome = ?failed.outcome, "partition failed");
  }

  if cli.json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  }

  Ok(if report.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
