//! Error type for `trailhead-nps`.

use thiserror::Error;

/// Errors building an [`NpsClient`](crate::NpsClient). Errors during a fetch
/// are [`FetchError`](trailhead_core::source::FetchError)s.
#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
