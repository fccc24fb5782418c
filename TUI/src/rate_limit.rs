//! Submission rate limiting.
//!
//! A rolling window of recent attempts plus a lifetime cap for the session.

use std::time::{Duration, Instant};

pub struct RateLimiter {
    attempts: Vec<Instant>,
    total_attempts: usize,
    max_attempts: usize,
    window: Duration,
    lockout_after: usize,
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration, lockout_after: usize) -> Self {
        Self {
            attempts: Vec::new(),
            total_attempts: 0,
            max_attempts,
            window,
            lockout_after,
        }
    }

    /// Record an attempt at `now` if the window has room for it.
    pub fn is_allowed(&mut self, now: Instant) -> bool {
        self.prune(now);

        if self.attempts.len() < self.max_attempts {
            self.attempts.push(now);
            self.total_attempts += 1;
            true
        } else {
            false
        }
    }

    /// How long until the oldest attempt leaves the window, if it is full.
    pub fn retry_after(&mut self, now: Instant) -> Option<Duration> {
        self.prune(now);
        if self.attempts.len() < self.max_attempts {
            return None;
        }
        self.attempts
            .first()
            .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
    }

    /// Past the lifetime cap the form stays closed for the rest of the session.
    pub fn is_locked_out(&self) -> bool {
        self.total_attempts > self.lockout_after
    }

    pub fn total_attempts(&self) -> usize {
        self.total_attempts
    }

    fn prune(&mut self, now: Instant) {
        let window = self.window;
        self.attempts
            .retain(|&time| now.duration_since(time) < window);
    }
}
