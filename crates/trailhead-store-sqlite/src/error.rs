//! Error type for `trailhead-store-sqlite`.

use rusqlite::ErrorCode;
use thiserror::Error;
use trailhead_core::store::StoreFailure;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreFailure for Error {
  fn is_unavailable(&self) -> bool {
    match self {
      Error::Database(tokio_rusqlite::Error::ConnectionClosed) => true,
      Error::Database(tokio_rusqlite::Error::Close(_)) => true,
      Error::Database(tokio_rusqlite::Error::Rusqlite(e)) => matches!(
        e.sqlite_error_code(),
        Some(
          ErrorCode::CannotOpen
            | ErrorCode::NotADatabase
            | ErrorCode::DatabaseCorrupt
            | ErrorCode::SystemIoFailure
            | ErrorCode::DiskFull
            | ErrorCode::ReadOnly
            | ErrorCode::PermissionDenied
        )
      ),
      _ => false,
    }
  }
}
