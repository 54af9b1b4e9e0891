//! Submitted form data.
//!
//! [`QueryDict`] is the form layer's view of a urlencoded request body. Widgets
//! pull their raw values out of it by field name. A list widget submits one
//! `list_field_NAME` input per row, so a key may repeat; pairs keep the
//! order they were submitted in.

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::{FormsError, FormsResult};

/// Submitted `(key, value)` pairs, read-only unless created with
/// [`QueryDict::new_mutable`].
///
/// # Examples
///
/// ```
/// use mongoforms_core::QueryDict;
///
/// let qd = QueryDict::parse("tags=%5B%22a%22%5D&name=Ada+Lovelace");
/// assert_eq!(qd.get("tags"), Some(r#"["a"]"#));
/// assert_eq!(qd.get("name"), Some("Ada Lovelace"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryDict {
    pairs: Vec<(String, String)>,
    mutable: bool,
}

impl QueryDict {
    /// Creates an empty, read-only `QueryDict`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty `QueryDict` that accepts [`set`](Self::set) and
    /// [`append`](Self::append).
    pub fn new_mutable() -> Self {
        Self {
            pairs: Vec::new(),
            mutable: true,
        }
    }

    /// Parses an `application/x-www-form-urlencoded` body.
    ///
    /// `+` decodes to a space; a key without `=` gets an empty value.
    pub fn parse(body: &str) -> Self {
        let pairs = body
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect();
        Self {
            pairs,
            mutable: false,
        }
    }

    /// Returns the last value submitted for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value submitted for `key`, in order.
    pub fn get_list(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Replaces all values of `key` with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::SuspiciousOperation`] if this `QueryDict` is read-only.
    pub fn set(&mut self, key: &str, value: &str) -> FormsResult<()> {
        self.ensure_mutable()?;
        self.pairs.retain(|(k, _)| k != key);
        self.pairs.push((key.to_string(), value.to_string()));
        Ok(())
    }

    /// Adds another value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::SuspiciousOperation`] if this `QueryDict` is read-only.
    pub fn append(&mut self, key: &str, value: &str) -> FormsResult<()> {
        self.ensure_mutable()?;
        self.pairs.push((key.to_string(), value.to_string()));
        Ok(())
    }

    /// Encodes the pairs back into a urlencoded body, in submission order.
    pub fn urlencode(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, NON_ALPHANUMERIC),
                    utf8_percent_encode(value, NON_ALPHANUMERIC)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Returns `true` if the key was submitted at least once.
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Returns `true` if nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn ensure_mutable(&self) -> FormsResult<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(FormsError::SuspiciousOperation(
                "This QueryDict instance is immutable".to_string(),
            ))
        }
    }
}

fn decode(input: &str) -> String {
    percent_decode_str(&input.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}
