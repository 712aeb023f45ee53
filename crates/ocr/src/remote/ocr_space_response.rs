use serde::Deserialize;

use crate::error::OcrError;

#[derive(Debug, Deserialize)]
pub struct OcrSpaceResponse {
    #[serde(rename(deserialize = "ParsedResults"), default)]
    pub parsed_results: Option<Vec<ParsedResult>>,
    #[serde(rename(deserialize = "OCRExitCode"), default)]
    pub exit_code: Option<i32>,
    #[serde(rename(deserialize = "IsErroredOnProcessing"), default)]
    pub is_errored: bool,
    #[serde(rename(deserialize = "ErrorMessage"), default)]
    pub error_message: Option<ErrorMessage>,
    #[serde(rename(deserialize = "ErrorDetails"), default)]
    pub error_details: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParsedResult {
    #[serde(rename(deserialize = "ParsedText"), default)]
    pub parsed_text: Option<String>,
    #[serde(rename(deserialize = "FileParseExitCode"), default)]
    pub exit_code: Option<i32>,
}

/// OCR.space sends either a single string or a list of strings here.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    fn joined(&self) -> String {
        match self {
            Self::One(msg) => msg.clone(),
            Self::Many(msgs) => msgs.join("; "),
        }
    }
}

impl OcrSpaceResponse {
    pub fn into_text(self) -> Result<String, OcrError> {
        if self.is_errored {
            let message = self
                .error_message
                .as_ref()
                .map(ErrorMessage::joined)
                .filter(|m| !m.is_empty())
                .or_else(|| self.error_details.clone().filter(|d| !d.is_empty()))
                .unwrap_or_else(|| format!("exit code {}", self.exit_code.unwrap_or_default()));
            return Err(OcrError::Provider(message));
        }

        let results = match self.parsed_results {
            Some(results) if !results.is_empty() => results,
            _ => return Err(OcrError::EmptyResult),
        };

        let text = results
            .into_iter()
            .filter_map(|r| r.parsed_text)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> OcrSpaceResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_parsed_text_joined_with_newlines() {
        let response = decode(
            r#"{
                "ParsedResults": [
                    {"FileParseExitCode": 1, "ParsedText": "LONG NAS100", "ErrorMessage": ""},
                    {"FileParseExitCode": 1, "ErrorMessage": ""},
                    {"FileParseExitCode": 1, "ParsedText": "Entry 21500"}
                ],
                "OCRExitCode": 1,
                "IsErroredOnProcessing": false,
                "ProcessingTimeInMilliseconds": "343"
            }"#,
        );

        assert_eq!(response.into_text().unwrap(), "LONG NAS100\nEntry 21500");
    }

    #[test]
    fn test_errored_response_uses_message_list() {
        let response = decode(
            r#"{
                "OCRExitCode": 99,
                "IsErroredOnProcessing": true,
                "ErrorMessage": ["Unable to recognize the file type", "E216:Unable to detect the file extension"]
            }"#,
        );

        match response.into_text() {
            Err(OcrError::Provider(msg)) => {
                assert_eq!(
                    msg,
                    "Unable to recognize the file type; E216:Unable to detect the file extension"
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_errored_response_with_single_message() {
        let response = decode(
            r#"{"IsErroredOnProcessing": true, "ErrorMessage": "Timed out waiting for results"}"#,
        );

        assert!(matches!(
            response.into_text(),
            Err(OcrError::Provider(msg)) if msg == "Timed out waiting for results"
        ));
    }

    #[test]
    fn test_errored_response_without_message_falls_back_to_exit_code() {
        let response = decode(r#"{"IsErroredOnProcessing": true, "OCRExitCode": 3}"#);

        assert!(matches!(
            response.into_text(),
            Err(OcrError::Provider(msg)) if msg == "exit code 3"
        ));
    }

    #[test]
    fn test_missing_results_is_empty() {
        let response = decode(r#"{"OCRExitCode": 1, "IsErroredOnProcessing": false}"#);
        assert!(matches!(response.into_text(), Err(OcrError::EmptyResult)));

        let response = decode(r#"{"ParsedResults": [], "IsErroredOnProcessing": false}"#);
        assert!(matches!(response.into_text(), Err(OcrError::EmptyResult)));
    }
}
