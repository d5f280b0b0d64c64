pub mod telegram;

use async_trait::async_trait;

use crate::error::Result;

pub use telegram::TelegramNotifier;

/// Delivers a plain-text message to the configured recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}
