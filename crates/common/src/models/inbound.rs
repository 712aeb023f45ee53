use uuid::Uuid;

/// Location of a chat message, enough to reply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i32,
}

/// A screenshot accepted from the input chat, waiting for OCR.
#[derive(Debug, Clone)]
pub struct InboundImage {
    pub id: Uuid,
    pub origin: MessageRef,
    pub image_url: String,
}

impl InboundImage {
    pub fn new(origin: MessageRef, image_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            image_url,
        }
    }
}
