//! Time sources for version stamps.
//!
//! Catalogs written in the legacy encoding may carry no version at all. The
//! reader then stamps them with the current time in milliseconds since the
//! Unix epoch, taken from an injected [`Clock`] so callers (and tests) decide
//! where "now" comes from.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// A source of wall-clock milliseconds since the Unix epoch.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// The system wall clock.
///
/// Readings never go backwards: if the wall clock steps back, the last value
/// handed out is repeated until real time catches up.
#[derive(Debug)]
pub struct SystemClock {
    last: AtomicI64,
}

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        SystemClock {
            last: AtomicI64::new(i64::MIN),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self.last.fetch_max(now, Ordering::AcqRel);
        previous.max(now)
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}
