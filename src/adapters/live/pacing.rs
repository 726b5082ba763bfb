//! Live adapter for the [`Pacer`] port.

use std::time::Duration;

use crate::ports::pacing::{Pacer, PauseFuture};

/// Pacer that sleeps for the requested interval.
pub struct FixedIntervalPacer;

impl Pacer for FixedIntervalPacer {
    fn pause(&self, interval: Duration) -> PauseFuture<'_> {
        Box::pin(tokio::time::sleep(interval))
    }
}
