//! The `ParkSource` trait — where raw park records come from.

use std::future::Future;

use thiserror::Error;

use crate::park::RawPark;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One page of raw records for a partition.
#[derive(Debug, Clone, Default)]
pub struct Page {
  pub records:  Vec<RawPark>,
  /// Whether another page follows this one.
  pub has_more: bool,
}

#[derive(Debug, Error)]
pub enum FetchError {
  /// Network trouble or a server-side error; a later attempt may succeed.
  #[error("transient fetch failure: {0}")]
  Transient(#[source] BoxError),

  /// The provider rejected the request or answered with something that is
  /// not the expected envelope.
  #[error("fatal fetch failure: {0}")]
  Fatal(#[source] BoxError),
}

impl FetchError {
  pub fn transient(err: impl Into<BoxError>) -> Self { Self::Transient(err.into()) }

  pub fn fatal(err: impl Into<BoxError>) -> Self { Self::Fatal(err.into()) }

  pub fn is_transient(&self) -> bool { matches!(self, Self::Transient(_)) }
}

/// A paginated, partitioned source of raw park records.
pub trait ParkSource: Send + Sync {
  /// Fetch the page of records for `partition` starting at `offset`.
  fn fetch_page<'a>(
    &'a self,
    partition: &'a str,
    offset: u32,
  ) -> impl Future<Output = Result<Page, FetchError>> + Send + 'a;
}
