use async_trait::async_trait;

use crate::error::OcrError;

/// Turns a publicly reachable image into plain text.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    async fn parse_image_url(&self, image_url: &str) -> Result<String, OcrError>;
}
