//! Form field definitions and type-level validation.
//!
//! Each [`FormFieldDef`] describes a single form field, including its type,
//! validators, widget, and metadata. The [`FormFieldType`] enum defines
//! the type-specific parsing and coercion logic through the
//! [`clean_field_value`] function. The four document variants hand their raw
//! input to the corresponding document field, which decodes the wire value
//! and cleans every sub-field.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use mongoforms_core::ValidationError;
use mongoforms_db::validators::Validator;
use mongoforms_db::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::document_widgets::Media;
use crate::embedded::EmbeddedModelFormField;
use crate::list::{ListFormField, SimpleListFormField};
use crate::list_embedded::ListEmbeddedModelFormField;
use crate::widgets::WidgetType;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("valid regex"));
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Defines the type of a form field, including type-specific parameters.
///
/// Each variant carries the parameters needed for parsing and validating
/// raw string input from form submissions. The [`clean_field_value`] function
/// dispatches on this enum to perform type coercion and built-in validation.
#[derive(Debug, Clone)]
pub enum FormFieldType {
    /// A character (string) field.
    Char {
        /// Minimum length (characters).
        min_length: Option<usize>,
        /// Maximum length (characters).
        max_length: Option<usize>,
        /// Whether to strip leading/trailing whitespace.
        strip: bool,
    },
    /// An integer field.
    Integer {
        /// Minimum allowed value.
        min_value: Option<i64>,
        /// Maximum allowed value.
        max_value: Option<i64>,
    },
    /// A floating-point field.
    Float {
        /// Minimum allowed value.
        min_value: Option<f64>,
        /// Maximum allowed value.
        max_value: Option<f64>,
    },
    /// A fixed-precision decimal field.
    Decimal {
        /// Maximum total number of digits.
        max_digits: u32,
        /// Number of digits after the decimal point.
        decimal_places: u32,
    },
    /// A boolean field (true/false).
    Boolean,
    /// A nullable boolean field (true/false/null).
    NullBoolean,
    /// A date field (YYYY-MM-DD).
    Date,
    /// A date-time field (YYYY-MM-DDTHH:MM:SS).
    DateTime,
    /// A time field (HH:MM:SS).
    Time,
    /// An email address field.
    Email,
    /// A URL field.
    Url,
    /// A UUID field.
    Uuid,
    /// A slug field (letters, numbers, hyphens, underscores).
    Slug,
    /// A single-choice field.
    Choice {
        /// Available choices as `(value, display_label)` pairs.
        choices: Vec<(String, String)>,
    },
    /// A JSON field.
    Json,
    /// A scalar list edited as one input per item.
    List(ListFormField),
    /// A scalar list edited as comma-separated text.
    SimpleList(SimpleListFormField),
    /// A single embedded sub-document.
    Embedded(EmbeddedModelFormField),
    /// A list of embedded sub-documents.
    ListEmbedded(ListEmbeddedModelFormField),
}

/// Complete definition of a form field.
///
/// A `FormFieldDef` captures everything needed to render, parse, and validate
/// a single form field. It is the form-layer analog of
/// [`FieldDef`](mongoforms_db::fields::FieldDef).
#[derive(Debug, Clone)]
pub struct FormFieldDef {
    /// The field name (HTML name attribute).
    pub name: String,
    /// The field type, controlling parsing and coercion.
    pub field_type: FormFieldType,
    /// Whether this field is required.
    pub required: bool,
    /// Default/initial value.
    pub initial: Option<Value>,
    /// Help text displayed alongside the field.
    pub help_text: String,
    /// Human-readable label.
    pub label: String,
    /// The widget type used for rendering.
    pub widget: WidgetType,
    /// Additional validators applied after type coercion.
    pub validators: Vec<Arc<dyn Validator>>,
    /// Custom error messages keyed by error code.
    pub error_messages: HashMap<String, String>,
    /// Whether the field is disabled (rendered but not editable).
    pub disabled: bool,
}

impl FormFieldDef {
    /// Creates a new `FormFieldDef` with sensible defaults.
    ///
    /// The field is required by default, uses the default widget for its type,
    /// and has no validators beyond the type-level validation.
    pub fn new(name: impl Into<String>, field_type: FormFieldType) -> Self {
        let name = name.into();
        let widget = default_widget_for_field_type(&field_type);
        let label = name.replace('_', " ");
        Self {
            name,
            field_type,
            required: true,
            initial: None,
            help_text: String::new(),
            label,
            widget,
            validators: Vec::new(),
            error_messages: HashMap::new(),
            disabled: false,
        }
    }

    /// Sets whether this field is required.
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the initial value.
    pub fn initial(mut self, value: Value) -> Self {
        self.initial = Some(value);
        self
    }

    /// Sets the help text.
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the widget type.
    pub fn widget(mut self, widget: WidgetType) -> Self {
        self.widget = widget;
        self
    }

    /// Adds a validator.
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Sets a custom error message for a given code.
    pub fn error_message(mut self, code: impl Into<String>, msg: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), msg.into());
        self
    }

    /// Sets whether this field is disabled.
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Returns the scripts and stylesheets the field's widget needs.
    pub fn media(&self) -> Media {
        match &self.field_type {
            FormFieldType::List(list) => list.widget.media(),
            FormFieldType::Embedded(embedded) => embedded.widget.media(),
            FormFieldType::ListEmbedded(list) => list.widget.media(),
            _ => Media::new(),
        }
    }

    /// Converts compound-field errors into messages, honouring a custom
    /// `required` message.
    fn messages(&self, errors: Vec<ValidationError>) -> Vec<String> {
        errors
            .into_iter()
            .map(|e| {
                if e.is_required() {
                    self.error_messages
                        .get("required")
                        .cloned()
                        .unwrap_or(e.message)
                } else {
                    e.to_string()
                }
            })
            .collect()
    }
}

/// Returns the default widget type for a given form field type.
pub const fn default_widget_for_field_type(field_type: &FormFieldType) -> WidgetType {
    match field_type {
        FormFieldType::Char { .. }
        | FormFieldType::Uuid
        | FormFieldType::Slug
        | FormFieldType::SimpleList(_) => WidgetType::TextInput,
        FormFieldType::Integer { .. }
        | FormFieldType::Float { .. }
        | FormFieldType::Decimal { .. } => WidgetType::NumberInput,
        FormFieldType::Boolean => WidgetType::CheckboxInput,
        FormFieldType::NullBoolean | FormFieldType::Choice { .. } => WidgetType::Select,
        FormFieldType::Date => WidgetType::DateInput,
        FormFieldType::DateTime => WidgetType::DateTimeInput,
        FormFieldType::Time => WidgetType::TimeInput,
        FormFieldType::Email => WidgetType::EmailInput,
        FormFieldType::Url => WidgetType::UrlInput,
        FormFieldType::Json => WidgetType::Textarea,
        FormFieldType::List(_) => WidgetType::ListField,
        FormFieldType::Embedded(_) => WidgetType::EmbeddedModelField,
        FormFieldType::ListEmbedded(_) => WidgetType::ListEmbeddedModelField,
    }
}

/// Cleans (validates and coerces) a raw form input string into a typed `Value`.
///
/// This performs type-level validation:
/// 1. Required check (if `required` and value is empty/None)
/// 2. Type coercion (string -> i64, date, etc.)
/// 3. Type-specific constraint validation (min/max, regex, choices)
/// 4. Custom validators
///
/// Document fields decode their wire value and clean each sub-field instead;
/// an optional list left empty cleans to an empty list rather than `Null`.
///
/// Returns the cleaned `Value` or a list of error messages.
pub fn clean_field_value(field: &FormFieldDef, raw: Option<&str>) -> Result<Value, Vec<String>> {
    let cleaned = match &field.field_type {
        FormFieldType::List(list) => list.clean(&field.name, raw, field.required),
        FormFieldType::SimpleList(list) => list.clean(raw, field.required),
        FormFieldType::Embedded(embedded) => embedded.clean(&field.name, raw, field.required),
        FormFieldType::ListEmbedded(list) => list.clean(&field.name, raw, field.required),
        scalar => return clean_scalar_value(field, scalar, raw),
    };
    cleaned
        .map_err(|errors| field.messages(errors))
        .and_then(|value| run_validators(field, value))
}

fn clean_scalar_value(
    field: &FormFieldDef,
    field_type: &FormFieldType,
    raw: Option<&str>,
) -> Result<Value, Vec<String>> {
    let raw = match field_type {
        FormFieldType::Char { strip: false, .. } => raw.unwrap_or(""),
        _ => raw.unwrap_or("").trim(),
    };
    if raw.is_empty() {
        if field.required {
            let message = field
                .error_messages
                .get("required")
                .cloned()
                .unwrap_or_else(|| ValidationError::required().message);
            return Err(vec![message]);
        }
        return Ok(field.initial.clone().unwrap_or(Value::Null));
    }
    let value = coerce(field_type, raw)?;
    run_validators(field, value)
}

fn invalid(message: &str) -> Vec<String> {
    vec![message.to_string()]
}

fn collected(errors: Vec<String>, value: Value) -> Result<Value, Vec<String>> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}

fn bounds<T: PartialOrd + fmt::Display>(n: &T, min: Option<&T>, max: Option<&T>) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(min) = min.filter(|min| n < *min) {
        errors.push(format!("Ensure this value is greater than or equal to {min}."));
    }
    if let Some(max) = max.filter(|max| n > *max) {
        errors.push(format!("Ensure this value is less than or equal to {max}."));
    }
    errors
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn matching(re: &Regex, raw: &str, message: &str) -> Result<Value, Vec<String>> {
    if re.is_match(raw) {
        Ok(Value::String(raw.to_string()))
    } else {
        Err(invalid(message))
    }
}

/// Parses non-empty input into the field type's value.
fn coerce(field_type: &FormFieldType, raw: &str) -> Result<Value, Vec<String>> {
    match field_type {
        FormFieldType::Char {
            min_length,
            max_length,
            strip,
        } => {
            let s = if *strip { raw.trim() } else { raw };
            let len = s.chars().count();
            let mut errors = Vec::new();
            if let Some(min) = min_length.filter(|min| len < *min) {
                errors.push(format!(
                    "Ensure this value has at least {min} characters (it has {len})."
                ));
            }
            if let Some(max) = max_length.filter(|max| len > *max) {
                errors.push(format!(
                    "Ensure this value has at most {max} characters (it has {len})."
                ));
            }
            collected(errors, Value::String(s.to_string()))
        }
        FormFieldType::Integer {
            min_value,
            max_value,
        } => {
            let n: i64 = raw
                .trim()
                .parse()
                .map_err(|_| invalid("Enter a whole number."))?;
            collected(
                bounds(&n, min_value.as_ref(), max_value.as_ref()),
                Value::Int(n),
            )
        }
        FormFieldType::Float {
            min_value,
            max_value,
        } => {
            let n: f64 = raw.trim().parse().map_err(|_| invalid("Enter a number."))?;
            collected(
                bounds(&n, min_value.as_ref(), max_value.as_ref()),
                Value::Float(n),
            )
        }
        FormFieldType::Decimal {
            max_digits,
            decimal_places,
        } => {
            let text = raw.trim();
            let n: f64 = text.parse().map_err(|_| invalid("Enter a number."))?;
            let unsigned = text.trim_start_matches('-');
            let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
            let mut errors = Vec::new();
            if whole.len() + fraction.len() > *max_digits as usize {
                errors.push(format!(
                    "Ensure that there are no more than {max_digits} digits in total."
                ));
            }
            if fraction.len() > *decimal_places as usize {
                errors.push(format!(
                    "Ensure that there are no more than {decimal_places} decimal places."
                ));
            }
            collected(errors, Value::Float(n))
        }
        FormFieldType::Boolean => Ok(Value::Bool(parse_bool(raw).unwrap_or(false))),
        FormFieldType::NullBoolean => match raw.to_lowercase().as_str() {
            "null" | "none" | "unknown" => Ok(Value::Null),
            other => parse_bool(other)
                .map(Value::Bool)
                .ok_or_else(|| invalid("Select a valid choice.")),
        },
        FormFieldType::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| invalid("Enter a valid date (YYYY-MM-DD).")),
        FormFieldType::DateTime => DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(Value::DateTime)
            .ok_or_else(|| invalid("Enter a valid date/time.")),
        FormFieldType::Time => TIME_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
            .map(Value::Time)
            .ok_or_else(|| invalid("Enter a valid time (HH:MM or HH:MM:SS).")),
        FormFieldType::Email => matching(&EMAIL_RE, raw, "Enter a valid email address."),
        FormFieldType::Url => matching(&URL_RE, raw, "Enter a valid URL."),
        FormFieldType::Slug => matching(
            &SLUG_RE,
            raw,
            "Enter a valid \"slug\" consisting of letters, numbers, underscores or hyphens.",
        ),
        FormFieldType::Uuid => uuid::Uuid::parse_str(raw)
            .map(Value::Uuid)
            .map_err(|_| invalid("Enter a valid UUID.")),
        FormFieldType::Choice { choices } => {
            if choices.iter().any(|(value, _)| value == raw) {
                Ok(Value::String(raw.to_string()))
            } else {
                Err(vec![format!(
                    "Select a valid choice. {raw} is not one of the available choices."
                )])
            }
        }
        FormFieldType::Json => serde_json::from_str::<serde_json::Value>(raw)
            .map(Value::from_json)
            .map_err(|_| invalid("Enter valid JSON.")),
        FormFieldType::List(_)
        | FormFieldType::SimpleList(_)
        | FormFieldType::Embedded(_)
        | FormFieldType::ListEmbedded(_) => {
            unreachable!("list and embedded fields are cleaned by their own form field")
        }
    }
}

/// Cleans a value taken out of a decoded sub-document.
///
/// Sub-document values arrive as JSON scalars (usually strings); they are
/// turned back into input strings and cleaned like submitted form data.
pub fn clean_input_value(field: &FormFieldDef, value: &Value) -> Result<Value, Vec<String>> {
    let raw = value.to_input_string();
    clean_field_value(field, raw.as_deref())
}

fn run_validators(field: &FormFieldDef, value: Value) -> Result<Value, Vec<String>> {
    let errors: Vec<String> = field
        .validators
        .iter()
        .filter_map(|validator| validator.validate(&value).err())
        .map(|e| e.to_string())
        .collect();
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}
