use std::collections::HashSet;

use common::{
    config::{DEFAULT_INSTRUMENT_SYMBOLS, ParserConfig},
    models::Direction,
};
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Invalid {field} pattern: {source}")]
    Regex {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Tunable vocabulary of the scraper. Label entries are regex fragments,
/// matched case-insensitively. Labels starting with a letter or digit only
/// match as whole words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    pub instrument_symbols: Vec<String>,
    /// Upper-case words that look like tickers but never are one.
    pub reserved_words: Vec<String>,
    pub entry_labels: Vec<String>,
    pub stop_loss_labels: Vec<String>,
    pub take_profit_1_labels: Vec<String>,
    pub take_profit_2_labels: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            instrument_symbols: owned(DEFAULT_INSTRUMENT_SYMBOLS),
            reserved_words: owned(&[
                "BUY", "SELL", "LONG", "SHORT", "ENTRY", "EN", "SL", "STOP", "LOSS", "TP", "TP1",
                "TP2", "TP3", "TARGET",
            ]),
            entry_labels: owned(&["ENTRY", "EN", "E", "@"]),
            stop_loss_labels: owned(&[r"SL", r"STOP(?:\s*LOSS)?"]),
            take_profit_1_labels: owned(&[r"TP\s?1", r"TARGET\s?1"]),
            take_profit_2_labels: owned(&[r"TP\s?2", r"TARGET\s?2"]),
        }
    }
}

impl PatternSet {
    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            instrument_symbols: config.instrument_symbols.clone(),
            ..Self::default()
        }
    }
}

const NUMBER: &str = r"(\d+(?:\.\d+)?)";

/// Compiled form of a [`PatternSet`].
#[derive(Debug, Clone)]
pub struct SignalPatterns {
    instrument: Regex,
    reserved: HashSet<String>,
    direction: Regex,
    entry: Regex,
    stop_loss: Regex,
    take_profit_1: Regex,
    take_profit_2: Regex,
}

impl SignalPatterns {
    pub fn compile(set: &PatternSet) -> Result<Self, PatternError> {
        let symbols: Vec<String> = set
            .instrument_symbols
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| regex::escape(s.trim()))
            .collect();

        let instrument = if symbols.is_empty() {
            r"\b([A-Z]{2,6}\d*)\b".to_string()
        } else {
            format!(r"\b((?i:{})|[A-Z]{{2,6}}\d*)\b", symbols.join("|"))
        };

        Ok(Self {
            instrument: build("instrument", &instrument)?,
            reserved: set
                .reserved_words
                .iter()
                .map(|w| w.to_uppercase())
                .collect(),
            direction: build("direction", r"(?i)\b(BUY|SELL|LONG|SHORT)\b")?,
            entry: labelled_number("entry", &set.entry_labels)?,
            stop_loss: labelled_number("stop-loss", &set.stop_loss_labels)?,
            take_profit_1: labelled_number("take-profit-1", &set.take_profit_1_labels)?,
            take_profit_2: labelled_number("take-profit-2", &set.take_profit_2_labels)?,
        })
    }

    pub fn instrument(&self, text: &str) -> Option<String> {
        self.instrument
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_uppercase())
            .find(|candidate| !candidate.is_empty() && !self.reserved.contains(candidate))
    }

    pub fn direction(&self, text: &str) -> Option<Direction> {
        self.direction
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| Direction::from_keyword(m.as_str()))
    }

    pub fn entry(&self, text: &str) -> Option<String> {
        first_number(&self.entry, text)
    }

    pub fn stop_loss(&self, text: &str) -> Option<String> {
        first_number(&self.stop_loss, text)
    }

    pub fn take_profit_1(&self, text: &str) -> Option<String> {
        first_number(&self.take_profit_1, text)
    }

    pub fn take_profit_2(&self, text: &str) -> Option<String> {
        first_number(&self.take_profit_2, text)
    }
}

fn build(field: &'static str, pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|source| PatternError::Regex { field, source })
}

fn labelled_number(field: &'static str, labels: &[String]) -> Result<Regex, PatternError> {
    let alternatives: Vec<String> = labels
        .iter()
        .filter(|l| !l.is_empty())
        .map(|label| {
            if label.starts_with(|c: char| c.is_alphanumeric()) {
                format!(r"\b(?:{})\b", label)
            } else {
                format!("(?:{})", label)
            }
        })
        .collect();

    // An empty alternation would match everywhere.
    let labels = if alternatives.is_empty() {
        r"\b\B".to_string()
    } else {
        alternatives.join("|")
    };

    build(field, &format!(r"(?i)(?:{})\D*{}", labels, NUMBER))
}

fn first_number(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
