//! Live adapter for the [`Clock`] port using the system clock.

use chrono::{DateTime, Utc};

use crate::ports::Clock;

/// Clock backed by the system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
