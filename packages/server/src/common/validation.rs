//! Input shape checks that run before any domain rule or database read.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} has an invalid value: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("invalid request body: {0}")]
    Body(String),
}

/// Trim `value` and require its length (in characters) to fall in `min..=max`.
pub fn bounded_text(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min {
        return Err(ValidationError::TooShort { field, min });
    }
    if len > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

/// Like [`bounded_text`] for optional fields; blank input becomes `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => bounded_text(field, text, 0, max).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_text_trims() {
        let text = bounded_text("reason", "   long enough text  ", 10, 100).unwrap();
        assert_eq!(text, "long enough text");
    }

    #[test]
    fn test_bounded_text_counts_characters_not_bytes() {
        // 10 accented characters, 20 bytes
        let text = "éééééééééé";
        assert!(bounded_text("reason", text, 10, 10).is_ok());
    }

    #[test]
    fn test_bounded_text_rejects_short_and_long() {
        assert_eq!(
            bounded_text("reason", "too short", 10, 1000),
            Err(ValidationError::TooShort { field: "reason", min: 10 })
        );
        let long = "x".repeat(1001);
        assert_eq!(
            bounded_text("reason", &long, 10, 1000),
            Err(ValidationError::TooLong { field: "reason", max: 1000 })
        );
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(optional_text("note", None, 500).unwrap(), None);
        assert_eq!(optional_text("note", Some("   "), 500).unwrap(), None);
        assert_eq!(
            optional_text("note", Some(" ok "), 500).unwrap(),
            Some("ok".to_string())
        );
        assert!(optional_text("note", Some(&"n".repeat(501)), 500).is_err());
    }
}
