//! Client-side request limiter: at most N requests per sliding one-second window

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Window {
    /// Timestamps of requests inside the current window
    request_times: VecDeque<Instant>,
    max_requests: usize,
    window: Duration,
}

impl Window {
    fn check_and_record(&mut self, now: Instant) -> Duration {
        while let Some(&front) = self.request_times.front() {
            if now.duration_since(front) >= self.window {
                self.request_times.pop_front();
            } else {
                break;
            }
        }

        if self.request_times.len() >= self.max_requests {
            if let Some(&oldest) = self.request_times.front() {
                return self.window - now.duration_since(oldest);
            }
        }

        self.request_times.push_back(now);
        Duration::ZERO
    }
}

/// Owned by one API client; the meeting fan-out goes through it too
pub struct RequestRateLimiter {
    inner: Mutex<Window>,
}

impl RequestRateLimiter {
    pub fn new(max_requests: usize) -> Self {
        Self::with_window(max_requests, Duration::from_secs(1))
    }

    pub fn with_window(max_requests: usize, window: Duration) -> Self {
        Self {
            inner: Mutex::new(Window {
                request_times: VecDeque::new(),
                max_requests: max_requests.max(1),
                window,
            }),
        }
    }

    fn try_acquire(&self) -> Duration {
        let mut window = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        window.check_and_record(Instant::now())
    }

    /// Wait until a slot in the window is free, then take it
    pub async fn acquire(&self) {
        loop {
            let wait = self.try_acquire();
            if wait.is_zero() {
                return;
            }
            tracing::debug!("Request rate limit: waiting {}ms", wait.as_millis());
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_allows_requests_within_limit() {
        let limiter = RequestRateLimiter::new(20);

        for _ in 0..20 {
            assert!(limiter.try_acquire().is_zero());
        }
    }

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let limiter = RequestRateLimiter::new(3);
        for _ in 0..3 {
            limiter.try_acquire();
        }

        let wait = limiter.try_acquire();
        assert!(!wait.is_zero());
        assert!(wait <= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_acquire_waits_for_window_to_slide() {
        let limiter = RequestRateLimiter::with_window(1, Duration::from_millis(30));
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(25));
    }
}
