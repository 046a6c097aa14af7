//! Error types for `trailhead-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("record has no park code")]
  MissingCode,

  #[error("unknown partition: {0:?}")]
  UnknownPartition(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
