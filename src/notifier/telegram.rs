use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::notifier::Notifier;

/// Sends alerts to a single Telegram chat as plain text.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(bot_token),
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let message = self.bot.send_message(self.chat_id, text).await?;
        debug!(chat_id = self.chat_id.0, message_id = message.id.0, "Telegram message delivered");
        Ok(())
    }
}
