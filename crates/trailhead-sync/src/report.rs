//! The per-run, per-partition outcome of a sync.

use chrono::{DateTime, Utc};
use serde::Serialize;
use trailhead_core::source::FetchError;
use uuid::Uuid;

/// Why a partition was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
  Transient,
  Fatal,
}

/// Terminal state of one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PartitionOutcome {
  /// Every page was fetched and every record written or skipped.
  Committed,
  /// Fetching stopped early. Parks written before the failure stay written.
  Failed { kind: FailureKind, error: String },
}

/// A record that was fetched but not written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
  /// The park code, when the record had one.
  pub code:   Option<String>,
  pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartitionReport {
  pub partition:     String,
  pub pages:         u32,
  pub parks_written: usize,
  pub skipped:       Vec<SkippedRecord>,
  pub outcome:       PartitionOutcome,
}

impl PartitionReport {
  pub(crate) fn new(partition: &str) -> Self {
    Self {
      partition:     partition.to_owned(),
      pages:         0,
      parks_written: 0,
      skipped:       Vec::new(),
      outcome:       PartitionOutcome::Committed,
    }
  }

  pub(crate) fn skip(&mut self, code: &str, reason: impl ToString) {
    self.skipped.push(SkippedRecord {
      code:   (!code.is_empty()).then(|| code.to_owned()),
      reason: reason.to_string(),
    });
  }

  pub(crate) fn fail(&mut self, err: &FetchError) {
    let kind = if err.is_transient() { FailureKind::Transient } else { FailureKind::Fatal };
    self.outcome = PartitionOutcome::Failed { kind, error: err.to_string() };
  }

  pub fn is_committed(&self) -> bool { self.outcome == PartitionOutcome::Committed }
}

/// Result of one pass over the partitions.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
  pub run_id:      Uuid,
  pub started_at:  DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
  pub partitions:  Vec<PartitionReport>,
}

impl SyncReport {
  /// `true` when no partition failed.
  pub fn is_success(&self) -> bool { self.partitions.iter().all(PartitionReport::is_committed) }

  pub fn failed(&self) -> impl Iterator<Item = &PartitionReport> {
    self.partitions.iter().filter(|p| !p.is_committed())
  }

  pub fn partition(&self, code: &str) -> Option<&PartitionReport> {
    self.partitions.iter().find(|p| p.partition == code)
  }

  pub fn parks_written(&self) -> usize { self.partitions.iter().map(|p| p.parks_written).sum() }

  pub fn records_skipped(&self) -> usize { self.partitions.iter().map(|p| p.skipped.len()).sum() }
}
