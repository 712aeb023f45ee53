use common::{config::ParserConfig, models::ParsedSignal};
use tracing::debug;

use crate::patterns::{PatternError, PatternSet, SignalPatterns};

/// Best-effort scraper for signal screenshots: every field is looked up
/// independently and the first hit wins. Nothing is cross-validated.
#[derive(Debug, Clone)]
pub struct SignalParser {
    patterns: SignalPatterns,
}

impl SignalParser {
    pub fn new(patterns: SignalPatterns) -> Self {
        Self { patterns }
    }

    pub fn from_config(config: &ParserConfig) -> Result<Self, PatternError> {
        let patterns = SignalPatterns::compile(&PatternSet::from_config(config))?;
        Ok(Self::new(patterns))
    }

    pub fn parse(&self, text: &str) -> ParsedSignal {
        // OCR often reads decimal commas.
        let text = text.replace(',', ".");

        let signal = ParsedSignal {
            instrument: self.patterns.instrument(&text),
            direction: self.patterns.direction(&text),
            entry: self.patterns.entry(&text),
            stop_loss: self.patterns.stop_loss(&text),
            take_profit_1: self.patterns.take_profit_1(&text),
            take_profit_2: self.patterns.take_profit_2(&text),
        };

        debug!(
            "Parsed {}/{} fields from {} characters",
            signal.found(),
            ParsedSignal::FIELD_COUNT,
            text.chars().count()
        );
        signal
    }
}
