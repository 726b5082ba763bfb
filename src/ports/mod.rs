//! Port traits for every external boundary.
//!
//! Each port is a small `Send + Sync` trait so tasks can run against
//! live adapters in production and hand-rolled fakes in tests. Async
//! methods return boxed futures to keep the traits dyn-compatible.

pub mod board;
pub mod clock;
pub mod notify;
pub mod pacing;
pub mod scorer;

use std::future::Future;
use std::pin::Pin;

/// Error type used across all port boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future type alias used by async ports to stay dyn-compatible.
pub type PortFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BoxError>> + Send + 'a>>;

pub use board::{BoardIssue, BoardReader, Mutation, MutationSink};
pub use clock::Clock;
pub use notify::Notifier;
pub use pacing::Pacer;
pub use scorer::SimilarityScorer;
