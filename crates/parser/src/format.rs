use std::{borrow::Cow, fmt::Display};

use common::models::ParsedSignal;

const MISSING: &str = "?";

pub fn format_summary(signal: &ParsedSignal) -> String {
    let field = |value: &Option<String>| value.as_deref().unwrap_or(MISSING).to_string();

    format!(
        "Instrument: {}\nType: {}\nEntry: {}\nSL: {}\nTP1: {}\nTP2: {}",
        field(&signal.instrument),
        signal.direction.map_or(MISSING, |d| d.as_str()),
        field(&signal.entry),
        field(&signal.stop_loss),
        field(&signal.take_profit_1),
        field(&signal.take_profit_2),
    )
}

/// First `limit` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

pub fn review_message(text: &str, limit: usize) -> String {
    format!(
        "Couldn't confidently parse 🤖\n```\n{}\n```",
        preview(text, limit)
    )
}

pub fn ocr_failure_message(error: &dyn Display) -> String {
    format!("OCR error: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::Direction;

    #[test]
    fn test_summary_with_all_fields() {
        let signal = ParsedSignal {
            instrument: Some("NAS100".to_string()),
            direction: Some(Direction::Buy),
            entry: Some("21500".to_string()),
            stop_loss: Some("21400".to_string()),
            take_profit_1: Some("21700".to_string()),
            take_profit_2: Some("21900".to_string()),
        };

        assert_eq!(
            format_summary(&signal),
            "Instrument: NAS100\nType: BUY\nEntry: 21500\nSL: 21400\nTP1: 21700\nTP2: 21900"
        );
    }

    #[test]
    fn test_summary_marks_missing_fields() {
        let signal = ParsedSignal {
            instrument: Some("XAUUSD".to_string()),
            direction: Some(Direction::Sell),
            entry: Some("2400".to_string()),
            stop_loss: Some("2410".to_string()),
            ..ParsedSignal::default()
        };

        let summary = format_summary(&signal);
        assert_eq!(summary.lines().count(), 6);
        assert!(summary.ends_with("TP1: ?\nTP2: ?"));
        assert!(summary.contains("Type: SELL"));
    }

    #[test]
    fn test_short_text_is_previewed_whole() {
        let text = "random screenshot text with no labels";
        assert_eq!(preview(text, 1500), text);
        assert!(matches!(preview(text, 1500), Cow::Borrowed(_)));
        assert_eq!(preview(text, text.len()), text);
    }

    #[test]
    fn test_long_text_is_cut_on_char_boundaries() {
        let text = "é".repeat(1600);
        let cut = preview(&text, 1500);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 1503);
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 0), "...");
    }

    #[test]
    fn test_review_message_wraps_preview() {
        assert_eq!(
            review_message("SL 1.2", 1500),
            "Couldn't confidently parse 🤖\n```\nSL 1.2\n```"
        );
    }

    #[test]
    fn test_ocr_failure_message() {
        let detail = "OCR provider returned HTTP 500: boom";
        assert_eq!(ocr_failure_message(&detail), "OCR error: OCR provider returned HTTP 500: boom");
    }
}
