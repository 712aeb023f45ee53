use anyhow::Context;
use async_trait::async_trait;
use common::models::MessageRef;
use teloxide::{
    prelude::*,
    types::{MessageId, ReplyParameters},
};
use tracing::info;

/// Outbound side of the chat platform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Answers in the conversation the screenshot came from, threaded to it.
    async fn reply(&self, origin: &MessageRef, text: &str) -> anyhow::Result<()>;

    /// Posts to the output chat.
    async fn publish(&self, text: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
    output_chat: ChatId,
}

impl TelegramGateway {
    pub fn new(bot: Bot, output_chat: ChatId) -> Self {
        Self { bot, output_chat }
    }
}

#[async_trait]
impl ChatGateway for TelegramGateway {
    async fn reply(&self, origin: &MessageRef, text: &str) -> anyhow::Result<()> {
        self.bot
            .send_message(ChatId(origin.chat_id), text)
            .reply_parameters(ReplyParameters::new(MessageId(origin.message_id)))
            .await
            .with_context(|| format!("Failed to reply in chat {}", origin.chat_id))?;
        Ok(())
    }

    async fn publish(&self, text: &str) -> anyhow::Result<()> {
        let sent = self
            .bot
            .send_message(self.output_chat, text)
            .await
            .with_context(|| format!("Failed to publish to chat {}", self.output_chat))?;
        info!("Published signal as message {} in chat {}", sent.id.0, self.output_chat);
        Ok(())
    }
}
