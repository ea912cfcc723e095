//! Politeness delay between fetches
//!
//! The clock is stamped when a fetch *finishes* (after any retries), so the
//! interval is measured from the end of one fetch to the start of the next
//! wait check. The clock also starts at construction, which spaces the
//! very first fetch from engine start-up.

use tokio::time::{Duration, Instant};

/// Enforces a minimum interval between successive page fetches
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request_time: Instant,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request_time: Instant::now(),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Time left before the next fetch may start, if any
    pub fn time_until_ready(&self) -> Option<Duration> {
        let elapsed = self.last_request_time.elapsed();
        if elapsed < self.min_interval {
            Some(self.min_interval - elapsed)
        } else {
            None
        }
    }

    /// Waits until `min_interval` has passed since the last completed fetch
    pub async fn wait_turn(&self) {
        if let Some(wait) = self.time_until_ready() {
            tracing::trace!("Rate limited, waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Stamps the clock; call once per URL after its fetch completes
    pub fn record_request_done(&mut self) {
        self.last_request_time = Instant::now();
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_turns_are_spaced() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();

        limiter.wait_turn().await;
        limiter.record_request_done();
        limiter.wait_turn().await;

        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_turn_waits_from_construction() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        assert!(limiter.time_until_ready().is_some());

        let start = Instant::now();
        limiter.wait_turn().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(limiter.time_until_ready().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_elapsed() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.record_request_done();

        tokio::time::advance(Duration::from_secs(2)).await;

        let start = Instant::now();
        limiter.wait_turn().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_remaining_interval_is_waited() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.record_request_done();

        tokio::time::advance(Duration::from_millis(600)).await;

        let wait = limiter.time_until_ready().unwrap();
        assert!(wait <= Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_never_waits() {
        let mut limiter = RateLimiter::new(Duration::ZERO);
        let start = Instant::now();

        for _ in 0..5 {
            limiter.wait_turn().await;
            limiter.record_request_done();
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.min_interval(), Duration::ZERO);
    }
}
