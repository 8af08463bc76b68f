pub mod error;
pub mod message;
pub mod telegram;

use async_trait::async_trait;

pub use error::NotifyError;
pub use telegram::TelegramNotifier;

/// Delivers operator-facing messages. Delivery is best-effort: a failure is
/// logged by the implementation and reported as `false`, never raised.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> bool;
}

/// Used when no channel is configured. Every message is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, text: &str) -> bool {
        tracing::debug!(chars = text.chars().count(), "no notifier configured, message dropped");
        true
    }
}
