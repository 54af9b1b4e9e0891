//! Error types for mongoforms.
//!
//! [`ValidationError`] carries a message and a machine-readable code the same
//! way the framework's validation errors do. [`FormsError`] covers the
//! failures that are not plain validation problems: undecodable wire values,
//! values of the wrong shape, and configuration mistakes.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error with optional field-level errors.
///
/// # Examples
///
/// ```
/// use mongoforms_core::error::ValidationError;
///
/// let err = ValidationError::required();
/// assert_eq!(err.code, "required");
///
/// let mut field_errors = std::collections::HashMap::new();
/// field_errors.insert(
///     "street".to_string(),
///     vec![ValidationError::new("Enter a valid value.", "invalid")],
/// );
/// let err = ValidationError::with_field_errors(field_errors);
/// assert!(err.to_string().contains("street"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of validation failure (e.g. "required", "invalid").
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: HashMap<String, String>,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: HashMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
            field_errors: HashMap::new(),
        }
    }

    /// The standard "This field is required." error.
    pub fn required() -> Self {
        Self::new("This field is required.", "required")
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: HashMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            params: HashMap::new(),
            field_errors,
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if this error was raised by a required check.
    pub fn is_required(&self) -> bool {
        self.code == "required"
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            let mut fields: Vec<_> = self.field_errors.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));
            let mut first = true;
            for (field, errors) in fields {
                for error in errors {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for mongoforms.
#[derive(Error, Debug)]
pub enum FormsError {
    /// A wire value (hidden input, stored string) is not valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// A value had the wrong shape for the field it was handed to.
    #[error("Unexpected value for '{field}': expected {expected}, found {found}")]
    UnexpectedValue {
        /// The field name.
        field: String,
        /// What the field accepts.
        expected: &'static str,
        /// A short description of what was received.
        found: String,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An operation that should not happen on well-formed input.
    #[error("Suspicious operation: {0}")]
    SuspiciousOperation(String),
}

impl From<serde_json::Error> for FormsError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }
}

/// A convenience type alias for `Result<T, FormsError>`.
pub type FormsResult<T> = Result<T, FormsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_simple() {
        let err = ValidationError::new("This field is required.", "required");
        assert_eq!(err.to_string(), "This field is required.");
    }

    #[test]
    fn test_validation_error_display_field_errors() {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            "email".to_string(),
            vec![ValidationError::new("Invalid email.", "invalid")],
        );
        field_errors.insert(
            "city".to_string(),
            vec![ValidationError::required()],
        );
        let err = ValidationError::with_field_errors(field_errors);
        assert_eq!(
            err.to_string(),
            "city: This field is required.; email: Invalid email."
        );
    }

    #[test]
    fn test_validation_error_with_param() {
        let err = ValidationError::new("Too short.", "min_length").with_param("min", "8");
        assert_eq!(err.params.get("min").unwrap(), "8");
    }

    #[test]
    fn test_required_error() {
        let err = ValidationError::required();
        assert!(err.is_required());
        assert!(!ValidationError::new("x", "invalid").is_required());
    }

    #[test]
    fn test_forms_error_display() {
        let err = FormsError::UnexpectedValue {
            field: "tags".into(),
            expected: "a JSON array",
            found: "object".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected value for 'tags': expected a JSON array, found object"
        );
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FormsError = json_err.into();
        assert!(matches!(err, FormsError::InvalidJson(_)));
    }
}
