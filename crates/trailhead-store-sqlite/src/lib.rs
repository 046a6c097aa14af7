//! SQLite backend for the trailhead park catalog.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod schema;
mod store;
mod write;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
