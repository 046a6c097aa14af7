//! Fixed-interval rate limiter shared by every request of one client.

use std::time::Duration;

use tokio::{sync::Mutex, time::Instant};

/// Spaces successive [`acquire`](Self::acquire) calls at least `interval`
/// apart.
///
/// Waiters queue on the inner mutex, so concurrent callers are released one
/// at a time in order.
#[derive(Debug)]
pub struct RateLimiter {
  interval: Duration,
  next:     Mutex<Option<Instant>>,
}

impl RateLimiter {
  pub fn new(interval: Duration) -> Self {
    Self { interval, next: Mutex::new(None) }
  }

  pub fn interval(&self) -> Duration { self.interval }

  /// Wait until the next request may start.
  pub async fn acquire(&self) {
    let mut next = self.next.lock().await;
    if let Some(at) = *next
      && at > Instant::now()
    {
      tokio::time::sleep_until(at).await;
    }
    *next = Some(Instant::now() + self.interval);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn first_acquire_does_not_wait() {
    let limiter = RateLimiter::new(Duration::from_secs(60));
    let start = Instant::now();
    limiter.acquire().await;
    assert!(start.elapsed() < Duration::from_secs(1));
  }

  #[tokio::test]
  async fn acquires_are_spaced_by_interval() {
    let interval = Duration::from_millis(40);
    let limiter = RateLimiter::new(interval);
    let start = Instant::now();
    for _ in 0..3 {
      limiter.acquire().await;
    }
    assert!(start.elapsed() >= interval * 2, "elapsed {:?}", start.elapsed());
  }

  #[tokio::test]
  async fn zero_interval_never_waits() {
    let limiter = RateLimiter::new(Duration::ZERO);
    let start = Instant::now();
    for _ in 0..100 {
      limiter.acquire().await;
    }
    assert!(start.elapsed() < Duration::from_secs(1));
  }
}
