pub mod extractor;
pub mod format;
pub mod patterns;

pub use extractor::SignalParser;
pub use format::{format_summary, ocr_failure_message, preview, review_message};
pub use patterns::{PatternError, PatternSet, SignalPatterns};
