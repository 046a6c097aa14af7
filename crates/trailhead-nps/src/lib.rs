//! Client for the park provider's paginated `/parks` API.
//!
//! [`NpsClient`] implements [`trailhead_core::source::ParkSource`]. Every
//! request goes through a shared [`RateLimiter`], so callers never burst
//! requests at the provider no matter how they loop over partitions.

mod client;
mod limiter;

pub mod error;

pub use client::{DEFAULT_BASE_URL, NpsClient, NpsConfig};
pub use error::{Error, Result};
pub use limiter::RateLimiter;
