//! Form fields for scalar list model fields.
//!
//! [`ListFormField`] is edited with one input per item; the client script
//! serializes the items to a JSON array in the field's hidden input.
//! [`SimpleListFormField`] uses a single text input with comma-separated
//! items, which leaves room for client-side tag plugins.

use mongoforms_core::{FormsResult, ValidationError, SETTINGS};
use mongoforms_db::Value;

use crate::document_widgets::ListFieldWidget;
use crate::wire;

/// The form field for a list of scalars edited one input per item.
///
/// Both directions use the decoded JSON array: the widget needs the items to
/// render one input each, and the model stores the list.
#[derive(Debug, Clone, Default)]
pub struct ListFormField {
    /// The widget used to render the list.
    pub widget: ListFieldWidget,
}

impl ListFormField {
    /// Creates a list field with the default widget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the widget.
    #[must_use]
    pub fn with_widget(mut self, widget: ListFieldWidget) -> Self {
        self.widget = widget;
        self
    }

    /// Converts a model or submitted value into the strings shown by the
    /// item inputs.
    ///
    /// An empty value yields a single blank item so the widget always
    /// renders one input.
    pub fn prepare_value(&self, name: &str, value: &Value) -> FormsResult<Vec<String>> {
        let items = match value {
            Value::Null => Vec::new(),
            Value::String(s) if s.is_empty() => Vec::new(),
            Value::String(s) => wire::decode_list(name, s)?,
            Value::List(items) => items.clone(),
            other => return Err(wire::unexpected(name, "a list", other)),
        };
        let mut prepared: Vec<String> = items
            .iter()
            .map(|item| item.to_input_string().unwrap_or_default())
            .collect();
        if prepared.is_empty() {
            prepared.push(String::new());
        }
        Ok(prepared)
    }

    /// Decodes the hidden input into a list.
    pub fn to_python(&self, name: &str, raw: Option<&str>) -> Result<Value, ValidationError> {
        match raw {
            None | Some("") => Ok(Value::List(Vec::new())),
            Some(raw) => wire::decode_list(name, raw)
                .map(Value::List)
                .map_err(|e| wire::invalid_input(&e)),
        }
    }

    /// Decodes and validates the hidden input.
    pub fn clean(
        &self,
        name: &str,
        raw: Option<&str>,
        required: bool,
    ) -> Result<Value, Vec<ValidationError>> {
        let value = self.to_python(name, raw).map_err(|e| vec![e])?;
        if required && value.is_empty_value() {
            return Err(vec![ValidationError::required()]);
        }
        Ok(value)
    }
}

/// The form field for a list of scalars edited as comma-separated text.
#[derive(Debug, Clone, Default)]
pub struct SimpleListFormField {
    /// Separator used when displaying the list. Defaults to the
    /// `simple_list_separator` setting.
    pub separator: Option<String>,
}

impl SimpleListFormField {
    /// Creates a comma-separated list field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display separator.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Joins the list items for display in the text input.
    ///
    /// A string is shown unchanged; it is either submitted text or an
    /// already-joined list.
    pub fn prepare_value(&self, value: &Value) -> String {
        match value {
            Value::List(items) => {
                let separator = self
                    .separator
                    .as_deref()
                    .unwrap_or(&SETTINGS.get_or_default().simple_list_separator);
                items
                    .iter()
                    .filter_map(Value::to_input_string)
                    .collect::<Vec<_>>()
                    .join(separator)
            }
            other => other.to_input_string().unwrap_or_default(),
        }
    }

    /// Splits the submitted text on commas, trimming each item.
    ///
    /// Blank items are dropped, so `"a, , b,"` is `["a", "b"]`.
    pub fn to_python(&self, raw: Option<&str>) -> Value {
        let items = raw
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(Value::from)
            .collect();
        Value::List(items)
    }

    /// Splits and validates the submitted text.
    pub fn clean(&self, raw: Option<&str>, required: bool) -> Result<Value, Vec<ValidationError>> {
        let value = self.to_python(raw);
        if required && value.is_empty_value() {
            return Err(vec![ValidationError::required()]);
        }
        Ok(value)
    }
}

impl From<ListFormField> for crate::fields::FormFieldType {
    fn from(field: ListFormField) -> Self {
        Self::List(field)
    }
}

impl From<SimpleListFormField> for crate::fields::FormFieldType {
    fn from(field: SimpleListFormField) -> Self {
        Self::SimpleList(field)
    }
}
