//! Core types and trait definitions for the trailhead park catalog sync.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! fetcher, the SQLite store and the orchestrator all depend on it.

pub mod error;
pub mod normalize;
pub mod park;
pub mod partition;
pub mod source;
pub mod store;
pub mod tags;

pub use error::{Error, Result};
