//! Pacing port for rate-limiting serialized external calls.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future returned by [`Pacer::pause`].
pub type PauseFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Inserts delays between successive external calls.
///
/// The board and scorer APIs are quota-limited; strictly serialized
/// calls with a fixed interval between them are the simplest way to
/// stay under quota. Tests inject a no-op pacer.
pub trait Pacer: Send + Sync {
    /// Waits for the given interval before the next call.
    fn pause(&self, interval: Duration) -> PauseFuture<'_>;
}

/// Pacer that returns immediately, for tests.
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&self, _interval: Duration) -> PauseFuture<'_> {
        Box::pin(std::future::ready(()))
    }
}
