// ABOUTME: Field-level validation primitives shared by request payloads
// ABOUTME: Collects per-field error messages in the `{field: [messages]}` wire shape

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Message for a field that was not supplied at all
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message for a string field that is empty after trimming
pub const BLANK_MESSAGE: &str = "This field may not be blank.";

/// Message for a field sent as an explicit JSON `null`
pub const NULL_MESSAGE: &str = "This field may not be null.";

/// Per-field validation errors, keyed by field name.
///
/// Serializes as a plain JSON object so it can be returned directly as a
/// 400 response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an error set holding a single message
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Record the outcome of a field check. Returns the value when the check
    /// passed, otherwise stores the message under `field` and returns `None`.
    pub fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Validate a required character field: present, not blank, and at most
/// `max_chars` characters after trimming surrounding whitespace.
pub fn validate_char_field(value: Option<&str>, max_chars: usize) -> Result<String, String> {
    let value = value.ok_or_else(|| REQUIRED_MESSAGE.to_string())?;
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(BLANK_MESSAGE.to_string());
    }

    validate_max_chars(trimmed, max_chars)?;

    Ok(trimmed.to_string())
}

/// Reject an explicit `null` while passing an absent key through as `None`
pub fn reject_null<T>(value: Option<Option<T>>) -> Result<Option<T>, String> {
    match value {
        Some(None) => Err(NULL_MESSAGE.to_string()),
        Some(Some(value)) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Length is counted in characters, not bytes
pub fn validate_max_chars(value: &str, max_chars: usize) -> Result<(), String> {
    if value.chars().count() > max_chars {
        return Err(format!(
            "Ensure this field has no more than {} characters.",
            max_chars
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, REQUIRED_MESSAGE)]
    #[case(Some(""), BLANK_MESSAGE)]
    #[case(Some("   "), BLANK_MESSAGE)]
    #[case(Some("abcdef"), "Ensure this field has no more than 5 characters.")]
    fn test_validate_char_field_rejects(#[case] input: Option<&str>, #[case] expected: &str) {
        assert_eq!(validate_char_field(input, 5).unwrap_err(), expected);
    }

    #[test]
    fn test_validate_char_field_trims() {
        assert_eq!(validate_char_field(Some("  hello "), 5).unwrap(), "hello");
    }

    #[test]
    fn test_reject_null_keeps_absent_and_values() {
        assert_eq!(reject_null::<i32>(None), Ok(None));
        assert_eq!(reject_null(Some(Some(3))), Ok(Some(3)));
        assert_eq!(
            reject_null::<i32>(Some(None)).unwrap_err(),
            NULL_MESSAGE
        );
    }

    #[test]
    fn test_validate_max_chars_counts_characters() {
        // Five characters, ten bytes
        assert!(validate_max_chars("ééééé", 5).is_ok());
        assert!(validate_max_chars("éééééé", 5).is_err());
    }

    #[test]
    fn test_field_errors_serialize_as_object() {
        let mut errors = FieldErrors::new();
        errors.add("title", REQUIRED_MESSAGE);
        errors.add("title", "second");
        errors.add("status", "bad");

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "status": ["bad"],
                "title": [REQUIRED_MESSAGE, "second"],
            })
        );
    }

    #[test]
    fn test_check_records_failures_only() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.check("a", Ok::<_, String>(1)), Some(1));
        assert!(errors.is_empty());

        assert_eq!(errors.check::<i32>("b", Err("nope".to_string())), None);
        assert_eq!(errors.get("b"), Some(&["nope".to_string()][..]));
        assert!(!errors.contains("a"));
    }
}
