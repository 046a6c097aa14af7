//! [`Syncer`] — the fetch → normalise → write loop over all partitions.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use trailhead_core::{
  normalize::normalize,
  park::RawPark,
  partition::{Partition, find_partition, list_partitions},
  source::{FetchError, Page, ParkSource},
  store::{ParkStore, StoreFailure},
  tags::TagIndex,
};
use uuid::Uuid;

use crate::{
  Error, Result,
  report::{PartitionReport, SyncReport},
};

/// Knobs for the orchestration loop. Rate limiting belongs to the source.
#[derive(Debug, Clone)]
pub struct SyncOptions {
  /// Extra attempts for a page after a transient fetch failure.
  pub max_retries:   u32,
  /// Delay before each retry.
  pub retry_backoff: Duration,
}

impl Default for SyncOptions {
  fn default() -> Self {
    Self { max_retries: 2, retry_backoff: Duration::from_secs(2) }
  }
}

/// Resolve partition codes given on the command line. An empty list selects
/// every partition.
pub fn select_partitions(codes: &[String]) -> Result<Vec<Partition>> {
  if codes.is_empty() {
    return Ok(list_partitions().to_vec());
  }
  let mut selected = Vec::with_capacity(codes.len());
  for code in codes {
    let partition =
      find_partition(code).ok_or_else(|| Error::UnknownPartition(code.clone()))?;
    if !selected.contains(&partition) {
      selected.push(partition);
    }
  }
  // Keep the canonical order regardless of how they were given.
  selected.sort_by_key(|p| list_partitions().iter().position(|q| q == p));
  Ok(selected)
}

/// Drives one sync run from a [`ParkSource`] into a [`ParkStore`].
pub struct Syncer<F, S> {
  source:  F,
  store:   S,
  options: SyncOptions,
}

impl<F, S> Syncer<F, S>
where
  F: ParkSource,
  S: ParkStore,
{
  pub fn new(source: F, store: S, options: SyncOptions) -> Self {
    Self { source, store, options }
  }

  pub fn store(&self) -> &S { &self.store }

  /// Sync `partitions` in order.
  ///
  /// Returns `Err` only if the store cannot be prepared or becomes
  /// unavailable mid-run; per-partition failures are in the report.
  pub async fn run(&self, partitions: &[Partition]) -> Result<SyncReport> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();

    // All partitions, not just the selected ones: a park may link to any.
    self
      .store
      .seed_partitions(list_partitions())
      .await
      .map_err(|e| Error::Store { stage: "seeding partitions", source: Box::new(e) })?;
    let mut index = self
      .store
      .load_tag_index()
      .await
      .map_err(|e| Error::Store { stage: "loading tags", source: Box::new(e) })?;

    info!(%run_id, partitions = partitions.len(), known_tags = index.len(), "sync started");

    let mut reports = Vec::with_capacity(partitions.len());
    for partition in partitions {
      match self.sync_partition(partition.code, &mut index).await {
        Ok(report) => reports.push(report),
        Err(Error::StoreUnavailable { partition, source, .. }) => {
          return Err(Error::StoreUnavailable { partition, source, completed: reports });
        }
        Err(err) => return Err(err),
      }
    }

    let report = SyncReport { run_id, started_at, finished_at: Utc::now(), partitions: reports };
    info!(
      %run_id,
      parks = report.parks_written(),
      skipped = report.records_skipped(),
      failed = report.failed().count(),
      "sync finished"
    );
    Ok(report)
  }

  async fn sync_partition(&self, partition: &str, index: &mut TagIndex) -> Result<PartitionReport> {
    let mut report = PartitionReport::new(partition);
    let mut offset = 0u32;
    let mut previous_first: Option<String> = None;

    loop {
      let page = match self.fetch_with_retry(partition, offset).await {
        Ok(page) => page,
        Err(err) => {
          warn!(partition, offset, error = %err, "abandoning partition");
          report.fail(&err);
          return Ok(report);
        }
      };
      report.pages += 1;

      // A provider that ignores `start` serves the same page forever.
      let first = page.records.first().map(|r| r.park_code.clone());
      if first.is_some() && first == previous_first {
        warn!(partition, offset, "provider repeated the previous page, stopping");
        break;
      }
      previous_first = first;

      let received = page.records.len();
      for raw in page.records {
        self.write_record(partition, raw, index, &mut report).await?;
      }

      if !page.has_more || received == 0 {
        break;
      }
      offset = offset.saturating_add(u32::try_from(received).unwrap_or(u32::MAX));
    }

    info!(
      partition,
      pages = report.pages,
      parks = report.parks_written,
      skipped = report.skipped.len(),
      "partition committed"
    );
    Ok(report)
  }

  async fn fetch_with_retry(&self, partition: &str, offset: u32) -> Result<Page, FetchError> {
    let mut attempt = 0;
    loop {
      match self.source.fetch_page(partition, offset).await {
        Err(err) if err.is_transient() && attempt < self.options.max_retries => {
          attempt += 1;
          warn!(partition, offset, attempt, error = %err, "transient fetch failure, retrying");
          tokio::time::sleep(self.options.retry_backoff).await;
        }
        result => return result,
      }
    }
  }

  async fn write_record(
    &self,
    partition: &str,
    raw:       RawPark,
    index:     &mut TagIndex,
    report:    &mut PartitionReport,
  ) -> Result<()> {
    let code = raw.park_code.trim().to_owned();

    let park = match normalize(raw, partition, index) {
      Ok(park) => park,
      Err(err) => {
        warn!(partition, park = %code, error = %err, "skipping record");
        report.skip(&code, err);
        return Ok(());
      }
    };
    if !park.ignored_partitions.is_empty() {
      debug!(partition, park = %code, ignored = ?park.ignored_partitions, "not linking unknown partitions");
    }

    match self.store.apply_park(park).await {
      Ok(()) => report.parks_written += 1,
      Err(err) if err.is_unavailable() => {
        return Err(Error::StoreUnavailable {
          partition: partition.to_owned(),
          source:    Box::new(err),
          completed: Vec::new(),
        });
      }
      Err(err) => {
        warn!(partition, park = %code, error = %err, "write failed, skipping record");
        report.skip(&code, err);
      }
    }
    Ok(())
  }
}
