//! Input validation for the text to classify.

use serde_json::Value;

use crate::error::{Error, Result};

/// Maximum length of the text, in characters, after trimming.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Trimmed, non-empty text of at most [`MAX_TEXT_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedText(String);

impl ValidatedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check a parsed body, failing on the first violated rule.
pub fn validate(body: &Value) -> Result<ValidatedText> {
    let object = body
        .as_object()
        .ok_or_else(|| invalid("Request body must be a JSON object"))?;

    let text = object
        .get("text")
        .ok_or_else(|| invalid("Missing 'text' field in request body"))?
        .as_str()
        .ok_or_else(|| invalid("'text' field must be a string"))?
        .trim();

    if text.is_empty() {
        return Err(invalid("Text cannot be empty"));
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(invalid(&format!(
            "Text is too long (max {} characters)",
            MAX_TEXT_CHARS
        )));
    }

    Ok(ValidatedText(text.to_string()))
}

fn invalid(message: &str) -> Error {
    Error::Validation(message.to_string())
}
