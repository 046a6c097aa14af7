//! Sync orchestration for the trailhead park catalog.
//!
//! [`Syncer`] walks the partitions one at a time: fetch a page from any
//! [`ParkSource`](trailhead_core::source::ParkSource), normalise each record,
//! apply it to any [`ParkStore`](trailhead_core::store::ParkStore), and move
//! on. A partition that cannot be fetched is recorded as failed in the
//! [`SyncReport`] and the run continues with the next one.

pub mod config;
pub mod error;
pub mod report;
pub mod syncer;

pub use config::SyncConfig;
pub use error::{Error, Result};
pub use report::{FailureKind, PartitionOutcome, PartitionReport, SkippedRecord, SyncReport};
pub use syncer::{SyncOptions, Syncer, select_partitions};
