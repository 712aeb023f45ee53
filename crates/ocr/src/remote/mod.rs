pub mod ocr_space_client;
pub mod ocr_space_response;

pub use ocr_space_client::OcrSpaceClient;
pub use ocr_space_response::{OcrSpaceResponse, ParsedResult};
