use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_LOCK_WAIT_MS: u64 = 5_000;
const DEFAULT_MAX_APPOINTMENT_MINUTES: i64 = 480;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Bounded wait for the per-doctor/per-room exclusion scope.
    pub lock_wait_ms: u64,
    /// Upper bound on a single appointment span.
    pub max_appointment_minutes: i64,
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        let lock_wait_ms = env::var("SCHEDULER_LOCK_WAIT_MS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| {
                warn!("SCHEDULER_LOCK_WAIT_MS not set, using default");
                DEFAULT_LOCK_WAIT_MS
            });

        let max_appointment_minutes = env::var("SCHEDULER_MAX_APPOINTMENT_MINUTES")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| {
                warn!("SCHEDULER_MAX_APPOINTMENT_MINUTES not set, using default");
                DEFAULT_MAX_APPOINTMENT_MINUTES
            });

        Self {
            lock_wait_ms,
            max_appointment_minutes,
        }
    }

    pub fn lock_wait(&self) -> Duration {
        Duration::from_millis(self.lock_wait_ms)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lock_wait_ms: DEFAULT_LOCK_WAIT_MS,
            max_appointment_minutes: DEFAULT_MAX_APPOINTMENT_MINUTES,
        }
    }
}
