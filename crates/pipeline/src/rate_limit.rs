//! Submission rate limiting.
//!
//! Sliding-window limiter keyed by client identifier. The prune, threshold
//! check, and timestamp record happen under one lock acquisition, so two
//! concurrent submissions from the same identifier can never both pass the
//! threshold.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use comment_core::{Error, RateLimitSettings, Result};

/// Sliding-window submission limiter.
pub struct SubmissionLimiter {
    history: Mutex<HashMap<String, Vec<Instant>>>,
    max_submissions: usize,
    window: Duration,
}

impl SubmissionLimiter {
    pub fn new(settings: &RateLimitSettings) -> Self {
        Self {
            history: Mutex::new(HashMap::new()),
            max_submissions: settings.max_submissions,
            window: Duration::from_secs(settings.window_secs),
        }
    }

    /// Check whether `identifier` may submit now, recording the acceptance
    /// timestamp when it may.
    pub fn check(&self, identifier: &str) -> Result<()> {
        let now = Instant::now();
        let mut history = self.history.lock();

        let timestamps = history.entry(identifier.to_string()).or_default();
        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() >= self.max_submissions {
            let retry_after = timestamps
                .first()
                .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
                .map(|d| d.as_secs().max(1));
            return Err(Error::rate_limited(
                format!("more than {} submissions in the window", self.max_submissions),
                retry_after,
            ));
        }

        timestamps.push(now);
        Ok(())
    }

    /// Drop identifiers with no activity inside `max_age`.
    pub fn cleanup_stale(&self, max_age: Duration) {
        let now = Instant::now();
        let mut history = self.history.lock();
        history.retain(|_, timestamps| {
            timestamps
                .last()
                .map(|t| now.duration_since(*t) < max_age)
                .unwrap_or(false)
        });
    }

    /// Number of tracked identifiers.
    pub fn tracked(&self) -> usize {
        self.history.lock().len()
    }
}
