use std::sync::Arc;

use anyhow::Context;
use common::{
    config::TelegramConfig,
    models::{InboundImage, MessageRef},
};
use teloxide::{prelude::*, types::FileMeta};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Listens to the input chat and queues every screenshot for the signal
/// service.
pub struct TelegramService {
    bot: Bot,
    input_chat: ChatId,
    file_base: String,
}

#[derive(Clone)]
struct Intake {
    input_chat: ChatId,
    file_base: String,
    image_tx: mpsc::Sender<InboundImage>,
}

impl TelegramService {
    pub fn new(bot: Bot, config: &TelegramConfig) -> Self {
        let file_base = format!(
            "{}/file/bot{}/",
            config.api_url.as_str().trim_end_matches('/'),
            bot.token()
        );

        Self {
            bot,
            input_chat: ChatId(config.input_chat_id),
            file_base,
        }
    }

    /// Runs the update dispatcher until Ctrl-C.
    pub async fn start(self, image_tx: mpsc::Sender<InboundImage>) -> anyhow::Result<()> {
        let me = self
            .bot
            .get_me()
            .await
            .context("Telegram getMe failed, check TELEGRAM_BOT_TOKEN")?;
        info!("Logged in as @{}", me.username());
        info!("Watching chat {} for signal screenshots", self.input_chat);

        let intake = Arc::new(Intake {
            input_chat: self.input_chat,
            file_base: self.file_base,
            image_tx,
        });

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(on_message))
            .branch(Update::filter_channel_post().endpoint(on_message));

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![intake])
            .default_handler(|_| async {})
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Telegram dispatcher stopped.");
        Ok(())
    }
}

async fn on_message(bot: Bot, msg: Message, intake: Arc<Intake>) -> ResponseResult<()> {
    if !intake.accepts(&msg) {
        return Ok(());
    }

    let Some(meta) = image_file(&msg) else {
        debug!("Message {} has no image, ignoring", msg.id.0);
        return Ok(());
    };

    // Errors here go to the dispatcher's logging error handler.
    let file = bot.get_file(meta.id.clone()).await?;
    let origin = MessageRef {
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
    };
    let image = InboundImage::new(origin, format!("{}{}", intake.file_base, file.path));

    info!("[{}] Queued screenshot from message {}", image.id, origin.message_id);

    if intake.image_tx.send(image).await.is_err() {
        warn!("Signal service channel closed, dropping screenshot");
    }
    Ok(())
}

impl Intake {
    fn accepts(&self, msg: &Message) -> bool {
        if msg.chat.id != self.input_chat {
            return false;
        }
        // Channel posts carry no author and are accepted.
        !msg.from.as_ref().is_some_and(|user| user.is_bot)
    }
}

/// First image of a message: the largest photo size, or a document with an
/// `image/*` MIME type.
fn image_file(msg: &Message) -> Option<&FileMeta> {
    if let Some(sizes) = msg.photo() {
        return sizes.last().map(|size| &size.file);
    }

    msg.document()
        .filter(|doc| {
            doc.mime_type
                .as_ref()
                .is_some_and(|mime| mime.essence_str().starts_with("image/"))
        })
        .map(|doc| &doc.file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    const INPUT_CHAT: i64 = -1001;

    fn message(extra: Value) -> Message {
        let mut base = json!({
            "message_id": 42,
            "date": 1_760_000_000,
            "chat": { "id": INPUT_CHAT, "type": "supergroup", "title": "signals" },
            "from": { "id": 7, "is_bot": false, "first_name": "Trader" }
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    fn intake() -> Intake {
        let (image_tx, _image_rx) = mpsc::channel(1);
        Intake {
            input_chat: ChatId(INPUT_CHAT),
            file_base: "https://api.telegram.org/file/botTOKEN/".to_string(),
            image_tx,
        }
    }

    fn photo() -> Value {
        json!({
            "photo": [
                { "file_id": "small", "file_unique_id": "s", "width": 90, "height": 60, "file_size": 1000 },
                { "file_id": "large", "file_unique_id": "l", "width": 1280, "height": 853, "file_size": 90000 }
            ]
        })
    }

    #[test]
    fn test_largest_photo_size_is_used() {
        let msg = message(photo());
        let file = image_file(&msg).unwrap();
        assert_eq!(file.size, 90000);
    }

    #[test]
    fn test_image_documents_are_accepted() {
        let msg = message(json!({
            "document": {
                "file_id": "doc", "file_unique_id": "d", "file_name": "chart.png",
                "mime_type": "image/png", "file_size": 5000
            }
        }));
        assert_eq!(image_file(&msg).map(|f| f.size), Some(5000));
    }

    #[test]
    fn test_non_image_documents_are_ignored() {
        let msg = message(json!({
            "document": {
                "file_id": "doc", "file_unique_id": "d", "file_name": "report.pdf",
                "mime_type": "application/pdf", "file_size": 5000
            }
        }));
        assert!(image_file(&msg).is_none());

        let msg = message(json!({ "text": "LONG NAS100 Entry 21500" }));
        assert!(image_file(&msg).is_none());
    }

    #[test]
    fn test_only_the_input_chat_is_accepted() {
        let intake = intake();
        assert!(intake.accepts(&message(photo())));

        let mut other = photo();
        other["chat"] = json!({ "id": -2002, "type": "supergroup", "title": "other" });
        assert!(!intake.accepts(&message(other)));
    }

    #[test]
    fn test_bot_authors_are_ignored() {
        let mut from_bot = photo();
        from_bot["from"] = json!({ "id": 9, "is_bot": true, "first_name": "Relay" });
        assert!(!intake().accepts(&message(from_bot)));
    }

    #[test]
    fn test_channel_posts_without_author_are_accepted() {
        let msg: Message = serde_json::from_value(json!({
            "message_id": 43,
            "date": 1_760_000_000,
            "chat": { "id": INPUT_CHAT, "type": "channel", "title": "signals" },
            "sender_chat": { "id": INPUT_CHAT, "type": "channel", "title": "signals" },
            "photo": photo()["photo"].clone()
        }))
        .unwrap();

        assert!(intake().accepts(&msg));
        assert!(image_file(&msg).is_some());
    }
}
