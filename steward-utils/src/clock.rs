//! Single time source shared by every session expiry check.

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
///
/// All expiry comparisons go through one injected clock so that tests can
/// drive time explicitly instead of sleeping.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
