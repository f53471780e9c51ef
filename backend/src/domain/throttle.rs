//! Fixed-window attempt throttling for credential verification.
//!
//! Attempts are counted per identifier (phone or username) within a fixed
//! window, and verification is refused once the budget is exhausted.
//! Successful verification clears the window.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde_json::json;

use super::error::Error;

/// Default attempt budget per window.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default window length.
#[must_use]
pub fn default_window() -> TimeDelta {
    TimeDelta::minutes(5)
}

#[derive(Debug, Clone, Copy)]
struct WindowState {
    window_start: DateTime<Utc>,
    attempts: u32,
}

/// Per-identifier fixed-window failure counter.
#[derive(Clone)]
pub struct AttemptThrottle {
    max_attempts: u32,
    window: TimeDelta,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<HashMap<String, WindowState>>>,
}

impl AttemptThrottle {
    /// Create a throttle with an explicit budget and window.
    #[must_use]
    pub fn new(max_attempts: u32, window: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_attempts,
            window,
            clock,
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a throttle with the default budget and window.
    #[must_use]
    pub fn with_defaults(clock: Arc<dyn Clock>) -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, default_window(), clock)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, WindowState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Refuse further verification attempts once the window budget is spent.
    pub fn check(&self, key: &str) -> Result<(), Error> {
        let now = self.clock.utc();
        let mut state = self.lock();
        let Some(entry) = state.get(key).copied() else {
            return Ok(());
        };
        if now - entry.window_start >= self.window {
            state.remove(key);
            return Ok(());
        }
        if entry.attempts >= self.max_attempts {
            let retry_after = (entry.window_start + self.window - now).num_seconds().max(0);
            return Err(Error::forbidden("too many failed attempts")
                .with_details(json!({ "retryAfterSeconds": retry_after })));
        }
        Ok(())
    }

    /// Record a failed verification attempt.
    pub fn record_failure(&self, key: &str) {
        let now = self.clock.utc();
        let mut state = self.lock();
        let entry = state.entry(key.to_owned()).or_insert(WindowState {
            window_start: now,
            attempts: 0,
        });
        if now - entry.window_start >= self.window {
            entry.window_start = now;
            entry.attempts = 0;
        }
        entry.attempts += 1;
    }

    /// Clear the counter after a successful verification.
    pub fn clear(&self, key: &str) {
        self.lock().remove(key);
    }
}
