//! Rate limiting implementation for the Gemini API client.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Enforces a fixed minimum interval between requests.
///
/// The pacing is non-adaptive: every call waits until at least
/// `min_interval` has elapsed since the previous one, then proceeds.
/// Quota errors from the server are handled by the caller.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    /// Completion time of the most recent acquire.
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given minimum interval.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Wait until the minimum interval since the last request has
    /// passed, then claim the slot.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// The configured minimum interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            min_interval: self.min_interval,
            last_request: Arc::clone(&self.last_request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_acquire_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(5));

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_second_acquire_waits() {
        let limiter = RateLimiter::new(Duration::from_millis(80));

        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_clones_share_pacing() {
        let limiter = RateLimiter::new(Duration::from_millis(60));
        let clone = limiter.clone();

        limiter.acquire().await;
        let start = Instant::now();
        clone.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(60));
    }
}
