use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("OCR request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("OCR provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("OCR response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("OCR provider reported an error: {0}")]
    Provider(String),
    #[error("OCR provider returned no parsed results")]
    EmptyResult,
}
