//! Sliding 24-hour window rate limiter for the expert-help tool (spec
//! §4.I, §3 "Expert-Help Usage Counter"). Process-wide and in-memory: one
//! `ExpertHelpLimiter` is shared behind an `Arc` across all requests.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

const WINDOW: Duration = Duration::hours(24);
const CEILING: usize = 2;

pub struct ExpertHelpLimiter {
    calls: Mutex<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl Default for ExpertHelpLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpertHelpLimiter {
    pub fn new() -> Self {
        Self { calls: Mutex::new(HashMap::new()) }
    }

    /// Purges timestamps older than the window, then reports whether
    /// `user_request_id` still has room for another call.
    pub fn check(&self, user_request_id: &str, now: DateTime<Utc>) -> bool {
        let mut calls = self.calls.lock();
        let timestamps = calls.entry(user_request_id.to_string()).or_default();
        purge(timestamps, now);
        timestamps.len() < CEILING
    }

    /// Records a call at `now`, purging stale timestamps first.
    pub fn record(&self, user_request_id: &str, now: DateTime<Utc>) {
        let mut calls = self.calls.lock();
        let timestamps = calls.entry(user_request_id.to_string()).or_default();
        purge(timestamps, now);
        timestamps.push(now);
    }
}

fn purge(timestamps: &mut Vec<DateTime<Utc>>, now: DateTime<Utc>) {
    timestamps.retain(|t| now - *t < WINDOW);
}

/// The tool handler's message when the caller is past the ceiling. Never
/// an exception — a success-shaped message telling the caller to ask the
/// user directly (spec §4.I).
pub const RATE_LIMITED_MESSAGE: &str =
    "Expert-help call limit reached for this request; ask the user directly instead.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_ceiling_then_refuses() {
        let limiter = ExpertHelpLimiter::new();
        let now = Utc::now();
        assert!(limiter.check("u1", now));
        limiter.record("u1", now);
        assert!(limiter.check("u1", now));
        limiter.record("u1", now);
        assert!(!limiter.check("u1", now));
    }

    #[test]
    fn entries_older_than_the_window_are_purged_on_access() {
        let limiter = ExpertHelpLimiter::new();
        let past = Utc::now() - Duration::hours(25);
        limiter.record("u1", past);
        limiter.record("u1", past);
        assert!(limiter.check("u1", Utc::now()));
    }

    #[test]
    fn counters_are_independent_per_user_request_id() {
        let limiter = ExpertHelpLimiter::new();
        let now = Utc::now();
        limiter.record("u1", now);
        limiter.record("u1", now);
        assert!(!limiter.check("u1", now));
        assert!(limiter.check("u2", now));
    }
}
