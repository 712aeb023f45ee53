use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// Maps a direction keyword (`BUY`, `SELL`, `LONG`, `SHORT`, any case).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "BUY" | "LONG" => Some(Self::Buy),
            "SELL" | "SHORT" => Some(Self::Sell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trading signal scraped from one screenshot. Prices stay as text, exactly as
/// they were read (after decimal-comma normalisation).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSignal {
    pub instrument: Option<String>,
    pub direction: Option<Direction>,
    pub entry: Option<String>,
    pub stop_loss: Option<String>,
    pub take_profit_1: Option<String>,
    pub take_profit_2: Option<String>,
}

impl ParsedSignal {
    pub const FIELD_COUNT: usize = 6;

    /// Number of fields that were recognised, between 0 and 6.
    pub fn found(&self) -> usize {
        [
            self.instrument.is_some(),
            self.direction.is_some(),
            self.entry.is_some(),
            self.stop_loss.is_some(),
            self.take_profit_1.is_some(),
            self.take_profit_2.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    pub fn is_confident(&self, min_fields: usize) -> bool {
        self.found() >= min_fields
    }
}
