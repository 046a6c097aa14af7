//! Error type for `trailhead-sync`.
//!
//! Only conditions that end the whole run are errors. A partition that fails
//! to fetch, or a record that fails to write, is recorded in the
//! [`SyncReport`](crate::SyncReport) instead.

use thiserror::Error;
use trailhead_core::source::BoxError;

use crate::report::PartitionReport;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown partition: {0:?}")]
  UnknownPartition(String),

  #[error("store error while {stage}: {source}")]
  Store {
    stage:  &'static str,
    #[source]
    source: BoxError,
  },

  /// The run stopped early. `completed` holds the partitions that finished
  /// before the store went away; their writes are committed.
  #[error("store became unavailable while syncing {partition}: {source}")]
  StoreUnavailable {
    partition: String,
    #[source]
    source:    BoxError,
    completed: Vec<PartitionReport>,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
