//! The JSON wire format carried by the hidden inputs of document widgets.
//!
//! Client-side scripts serialize the visible inputs into the hidden input on
//! submit:
//!
//! - a scalar list as a JSON array (`["a","b"]`),
//! - an embedded document as a JSON object of raw strings
//!   (`{"street":"Main","number":"3"}`),
//! - a list of embedded documents as a JSON array of such objects.
//!
//! Decoding failures are reported as [`FormsError`]s; the document fields turn
//! them into `invalid` validation errors with [`invalid_input`].

use mongoforms_core::{FormsError, FormsResult, ValidationError};
use mongoforms_db::{Document, Value};

/// Parses a wire string into a JSON value.
pub fn parse(raw: &str) -> FormsResult<serde_json::Value> {
    Ok(serde_json::from_str(raw)?)
}

/// Decodes a JSON array into a list of values.
pub fn decode_list(field: &str, raw: &str) -> FormsResult<Vec<Value>> {
    match Value::from_json(parse(raw)?) {
        Value::List(items) => Ok(items),
        other => Err(unexpected(field, "a JSON array", &other)),
    }
}

/// Decodes a JSON object into a sub-document.
pub fn decode_document(field: &str, raw: &str) -> FormsResult<Document> {
    match Value::from_json(parse(raw)?) {
        Value::Document(doc) => Ok(doc),
        other => Err(unexpected(field, "a JSON object", &other)),
    }
}

/// Decodes a JSON array of objects into a list of sub-documents.
pub fn decode_document_list(field: &str, raw: &str) -> FormsResult<Vec<Document>> {
    decode_list(field, raw)?
        .into_iter()
        .map(|item| match item {
            Value::Document(doc) => Ok(doc),
            other => Err(unexpected(field, "an array of JSON objects", &other)),
        })
        .collect()
}

/// Encodes a value in its compact wire form.
pub fn encode(value: &Value) -> String {
    value.to_json().to_string()
}

/// Builds the `UnexpectedValue` error for a value of the wrong shape.
pub fn unexpected(field: &str, expected: &'static str, found: &Value) -> FormsError {
    FormsError::UnexpectedValue {
        field: field.to_string(),
        expected,
        found: found.kind().to_string(),
    }
}

/// Turns a decoding failure into the `invalid` validation error shown to
/// the user.
pub fn invalid_input(err: &FormsError) -> ValidationError {
    tracing::debug!(error = %err, "rejecting undecodable wire value");
    ValidationError::new("Enter a valid value.", "invalid").with_param("detail", err.to_string())
}
