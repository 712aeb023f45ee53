use std::{env, fmt, str::FromStr, time::Duration};

use thiserror::Error;
use url::Url;

pub const DEFAULT_OCR_API_URL: &str = "https://api.ocr.space/parse/imageurl";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_INSTRUMENT_SYMBOLS: &[&str] =
    &["NAS100", "US30", "SPX500", "XAUUSD", "EURUSD", "GBPUSD", "NQ", "ES"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub ocr: OcrConfig,
    pub parser: ParserConfig,
}

#[derive(Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub api_url: Url,
    pub input_chat_id: i64,
    pub output_chat_id: i64,
}

#[derive(Clone)]
pub struct OcrConfig {
    pub api_key: String,
    pub endpoint: Url,
    pub engine: u8,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Minimum number of recognised fields before a signal is published.
    pub min_fields: usize,
    /// Max characters of raw OCR text echoed back when parsing is not confident.
    pub preview_limit: usize,
    pub instrument_symbols: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_fields: 4,
            preview_limit: 1500,
            instrument_symbols: DEFAULT_INSTRUMENT_SYMBOLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let telegram = TelegramConfig {
            token: vars.required("TELEGRAM_BOT_TOKEN")?,
            api_url: vars.url("TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL)?,
            input_chat_id: vars.required_parsed("INPUT_CHAT_ID")?,
            output_chat_id: vars.required_parsed("OUTPUT_CHAT_ID")?,
        };

        let engine: u8 = vars.parsed_or("OCR_ENGINE", 2)?;
        if !(1..=3).contains(&engine) {
            return Err(ConfigError::Invalid {
                key: "OCR_ENGINE",
                reason: format!("engine {} does not exist, expected 1, 2 or 3", engine),
            });
        }

        let timeout_secs: u64 = vars.parsed_or("OCR_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "OCR_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let ocr = OcrConfig {
            api_key: vars.required("OCR_API_KEY")?,
            endpoint: vars.url("OCR_API_URL", DEFAULT_OCR_API_URL)?,
            engine,
            timeout: Duration::from_secs(timeout_secs),
        };

        let defaults = ParserConfig::default();
        let min_fields: usize = vars.parsed_or("MIN_CONFIDENCE", defaults.min_fields)?;
        if min_fields > 6 {
            return Err(ConfigError::Invalid {
                key: "MIN_CONFIDENCE",
                reason: format!("{} is above the 6 recognised fields", min_fields),
            });
        }

        let instrument_symbols = match vars.get("INSTRUMENT_SYMBOLS") {
            Some(raw) => {
                let symbols: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                if symbols.is_empty() {
                    return Err(ConfigError::Invalid {
                        key: "INSTRUMENT_SYMBOLS",
                        reason: "no symbols listed".to_string(),
                    });
                }
                symbols
            }
            None => defaults.instrument_symbols,
        };

        let parser = ParserConfig {
            min_fields,
            preview_limit: vars.parsed_or("PREVIEW_LIMIT", defaults.preview_limit)?,
            instrument_symbols,
        };

        Ok(Self {
            telegram,
            ocr,
            parser,
        })
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn required_parsed<T>(&self, key: &'static str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.required(key)?;
        parse_value(key, &raw)
    }

    fn parsed_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(key) {
            Some(raw) => parse_value(key, &raw),
            None => Ok(default),
        }
    }

    fn url(&self, key: &'static str, default: &str) -> Result<Url, ConfigError> {
        let raw = self.get(key).unwrap_or_else(|| default.to_string());
        Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        reason: format!("{:?}: {}", raw, e),
    })
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url.as_str())
            .field("input_chat_id", &self.input_chat_id)
            .field("output_chat_id", &self.output_chat_id)
            .finish()
    }
}

impl fmt::Debug for OcrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .field("engine", &self.engine)
            .field("timeout", &self.timeout)
            .finish()
    }
}
