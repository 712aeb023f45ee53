use async_trait::async_trait;
use common::config::OcrConfig;
use reqwest::{Client, Url};
use tracing::{debug, error};

use crate::{error::OcrError, remote::OcrSpaceResponse, traits::OcrProvider};

const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Clone)]
pub struct OcrSpaceClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    engine: u8,
}

impl OcrSpaceClient {
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let client = Client::builder()
            .user_agent("signal_relay_bot/0.1.0")
            .timeout(config.timeout)
            .build()
            .map_err(OcrError::Client)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            engine: config.engine,
        })
    }
}

#[async_trait]
impl OcrProvider for OcrSpaceClient {
    async fn parse_image_url(&self, image_url: &str) -> Result<String, OcrError> {
        let engine = self.engine.to_string();
        let params = [
            ("apikey", self.api_key.as_str()),
            ("url", image_url),
            ("OCREngine", engine.as_str()),
            ("scale", "true"),
            ("isTable", "false"),
            ("detectOrientation", "true"),
        ];

        debug!("Requesting OCR from {}", self.endpoint);

        let resp = self
            .client
            .post(self.endpoint.clone())
            .form(&params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
            error!("OCR request failed: HTTP {} {}", status.as_u16(), body);
            return Err(OcrError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let response: OcrSpaceResponse = serde_json::from_slice(&bytes)?;
        let text = response.into_text()?;

        debug!("OCR returned {} characters", text.chars().count());
        Ok(text)
    }
}
