//! Session engine configuration.

use std::env;

use chrono::Duration;
use tracing::warn;

/// Default sliding timeout for button-based pagination sessions.
pub const DEFAULT_PAGINATION_TIMEOUT_SECS: u64 = 120;
/// Default time a confirmation prompt stays answerable.
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 60;
/// Default period of the background expiry sweep.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;
/// Default absolute lifetime of a pagination session, regardless of activity.
pub const DEFAULT_MAX_LIFETIME_SECS: u64 = 30 * 60;

/// Timeouts and sweep cadence for the session engine.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Sliding TTL refreshed on every navigation click.
    pub pagination_ttl: Duration,
    /// Hard cap on a pagination session's lifetime; `None` disables it.
    pub max_lifetime: Option<Duration>,
    pub confirmation_ttl: Duration,
    pub sweep_interval: std::time::Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pagination_ttl: secs(DEFAULT_PAGINATION_TIMEOUT_SECS),
            max_lifetime: Some(secs(DEFAULT_MAX_LIFETIME_SECS)),
            confirmation_ttl: secs(DEFAULT_CONFIRMATION_TIMEOUT_SECS),
            sweep_interval: std::time::Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

impl SessionConfig {
    /// Read overrides from the environment, falling back to defaults.
    ///
    /// `SESSION_MAX_LIFETIME_SECS=0` disables the lifetime cap.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: u64| -> u64 {
            let Some(raw) = lookup(key) else {
                return default;
            };

            match raw.trim().parse::<u64>() {
                Ok(value) => value,
                Err(_) => {
                    warn!(key, value = %raw, default, "ignoring unparseable setting");
                    default
                }
            }
        };

        let max_lifetime = read("SESSION_MAX_LIFETIME_SECS", DEFAULT_MAX_LIFETIME_SECS);

        Self {
            pagination_ttl: secs(read(
                "PAGINATION_TIMEOUT_SECS",
                DEFAULT_PAGINATION_TIMEOUT_SECS,
            )),
            max_lifetime: (max_lifetime > 0).then(|| secs(max_lifetime)),
            confirmation_ttl: secs(read(
                "CONFIRMATION_TIMEOUT_SECS",
                DEFAULT_CONFIRMATION_TIMEOUT_SECS,
            )),
            sweep_interval: std::time::Duration::from_secs(
                read("SESSION_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS).max(1),
            ),
        }
    }
}

fn secs(value: u64) -> Duration {
    Duration::seconds(i64::from(u32::try_from(value).unwrap_or(u32::MAX)))
}
