//! The `ParkStore` trait — the write side the sync pipeline needs.
//!
//! Implemented by storage backends (e.g. `trailhead-store-sqlite`). The
//! orchestrator depends on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::{park::NormalizedPark, partition::Partition, tags::TagIndex};

/// Classification a store error must provide to the orchestrator.
pub trait StoreFailure: std::error::Error {
  /// `true` when the store itself is gone (cannot open, I/O failure, closed
  /// connection, ...) and no later write can succeed either.
  fn is_unavailable(&self) -> bool;
}

/// Abstraction over the relational store the catalog is written into.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait ParkStore: Send + Sync {
  type Error: StoreFailure + Send + Sync + 'static;

  /// Insert every partition that is not already present. Existing rows are
  /// left untouched.
  fn seed_partitions<'a>(
    &'a self,
    partitions: &'a [Partition],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Build a [`TagIndex`] from the tags already in the store.
  fn load_tag_index(
    &self,
  ) -> impl Future<Output = Result<TagIndex, Self::Error>> + Send + '_;

  /// Apply one normalised park atomically.
  ///
  /// Scalar fields of the park are replaced; tags and links are inserted only
  /// if absent; media and people are replaced as a set. Applying the same
  /// record twice leaves the store as applying it once does.
  fn apply_park(
    &self,
    park: NormalizedPark,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
