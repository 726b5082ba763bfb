//! Notification sink port for status reports.

use super::PortFuture;

/// Sends human-readable status messages to a chat channel.
pub trait Notifier: Send + Sync {
    /// Delivers a message to the configured channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be delivered.
    fn send(&self, message: &str) -> PortFuture<'_, ()>;
}
