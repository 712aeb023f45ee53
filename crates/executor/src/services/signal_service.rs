use common::{
    config::ParserConfig,
    models::{InboundImage, ParsedSignal},
};
use ocr::OcrProvider;
use parser::{SignalParser, format_summary, ocr_failure_message, review_message};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::gateway::ChatGateway;

/// What happened to one screenshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Published(ParsedSignal),
    NeedsReview { found: usize },
    OcrFailed,
}

pub struct SignalService<O, G> {
    ocr: O,
    gateway: G,
    parser: SignalParser,
    min_fields: usize,
    preview_limit: usize,
}

impl<O, G> SignalService<O, G>
where
    O: OcrProvider,
    G: ChatGateway,
{
    pub fn new(ocr: O, gateway: G, parser: SignalParser, config: &ParserConfig) -> Self {
        Self {
            ocr,
            gateway,
            parser,
            min_fields: config.min_fields,
            preview_limit: config.preview_limit,
        }
    }

    /// Handles queued screenshots one at a time until the intake side closes.
    pub async fn start(self, mut rx: mpsc::Receiver<InboundImage>) {
        info!(
            "Starting Signal Service (publishing at {}/{} fields)",
            self.min_fields,
            ParsedSignal::FIELD_COUNT
        );

        while let Some(image) = rx.recv().await {
            match self.handle(&image).await {
                Ok(outcome) => debug!("[{}] Done: {:?}", image.id, outcome),
                // Only this screenshot is lost; keep listening.
                Err(e) => error!("[{}] Failed to handle screenshot: {:#}", image.id, e),
            }
        }

        info!("Screenshot channel closed. Stopping service.");
    }

    pub async fn handle(&self, image: &InboundImage) -> anyhow::Result<Outcome> {
        let text = match self.ocr.parse_image_url(&image.image_url).await {
            Ok(text) => text,
            Err(e) => {
                warn!("[{}] OCR failed: {}", image.id, e);
                self.gateway
                    .reply(&image.origin, &ocr_failure_message(&e))
                    .await?;
                return Ok(Outcome::OcrFailed);
            }
        };

        let signal = self.parser.parse(&text);
        let found = signal.found();
        debug!(
            "[{}] Parsed signal: {}",
            image.id,
            serde_json::to_string(&signal).unwrap_or_default()
        );

        if !signal.is_confident(self.min_fields) {
            info!(
                "[{}] Only {}/{} fields recognised, asking for manual review",
                image.id,
                found,
                ParsedSignal::FIELD_COUNT
            );
            self.gateway
                .reply(&image.origin, &review_message(&text, self.preview_limit))
                .await?;
            return Ok(Outcome::NeedsReview { found });
        }

        self.gateway.publish(&format_summary(&signal)).await?;
        info!(
            "[{}] Published {} {} ({}/{} fields)",
            image.id,
            signal.direction.map_or("?", |d| d.as_str()),
            signal.instrument.as_deref().unwrap_or("?"),
            found,
            ParsedSignal::FIELD_COUNT
        );

        Ok(Outcome::Published(signal))
    }
}
