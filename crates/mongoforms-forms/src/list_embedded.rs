//! The form field for a list of embedded sub-documents.
//!
//! Each list item is handled by one shared [`EmbeddedModelFormField`] built
//! from the item model; the widget renders one table row per item.

use mongoforms_core::{FormsResult, ValidationError};
use mongoforms_db::{Document, ModelMeta, Value};

use crate::document_widgets::ListEmbeddedModelFieldWidget;
use crate::embedded::EmbeddedModelFormField;
use crate::fields::{FormFieldDef, FormFieldType};
use crate::wire;

/// The form field for a list of embedded-model items.
#[derive(Debug, Clone)]
pub struct ListEmbeddedModelFormField {
    embedded: EmbeddedModelFormField,
    /// The widget used to render the rows.
    pub widget: ListEmbeddedModelFieldWidget,
}

impl ListEmbeddedModelFormField {
    /// Creates the field for lists of the given embedded model.
    pub fn new(model: &'static ModelMeta) -> Self {
        Self {
            embedded: EmbeddedModelFormField::new(model),
            widget: ListEmbeddedModelFieldWidget::default(),
        }
    }

    /// Replaces the widget.
    #[must_use]
    pub fn with_widget(mut self, widget: ListEmbeddedModelFieldWidget) -> Self {
        self.widget = widget;
        self
    }

    /// The field that handles each item.
    pub const fn embedded_field(&self) -> &EmbeddedModelFormField {
        &self.embedded
    }

    /// Returns one prepared sub-field set per item.
    ///
    /// `value` may be a list of documents (stored instances) or the hidden
    /// input's JSON array. Without items a single blank set is returned so
    /// the widget renders one empty row.
    pub fn prepare_value(&self, name: &str, value: &Value) -> FormsResult<Vec<Vec<FormFieldDef>>> {
        let items = match value {
            Value::Null => Vec::new(),
            Value::String(s) if s.is_empty() => Vec::new(),
            Value::String(s) => wire::decode_list(name, s)?,
            Value::List(items) => items.clone(),
            other => return Err(wire::unexpected(name, "a list of documents", other)),
        };
        let mut rows = items
            .iter()
            .map(|item| self.embedded.prepare_value(name, item))
            .collect::<FormsResult<Vec<_>>>()?;
        if rows.is_empty() {
            rows.push(self.embedded.prepare_value(name, &Value::Null)?);
        }
        Ok(rows)
    }

    /// Decodes the hidden input into a list of documents.
    pub fn to_python(
        &self,
        name: &str,
        raw: Option<&str>,
    ) -> Result<Vec<Document>, ValidationError> {
        match raw {
            None | Some("") => Ok(Vec::new()),
            Some(raw) => {
                wire::decode_document_list(name, raw).map_err(|e| wire::invalid_input(&e))
            }
        }
    }

    /// Decodes the hidden input and cleans every item.
    ///
    /// Items are cleaned with the same `required` flag as the list. An
    /// optional list skips rows left entirely blank; a required one reports
    /// them. Item errors are prefixed with the 1-based row number.
    pub fn clean(
        &self,
        name: &str,
        raw: Option<&str>,
        required: bool,
    ) -> Result<Value, Vec<ValidationError>> {
        let docs = self.to_python(name, raw).map_err(|e| vec![e])?;
        if required && docs.is_empty() {
            return Err(vec![ValidationError::required()]);
        }

        let mut items = Vec::with_capacity(docs.len());
        let mut errors = Vec::new();
        for (index, doc) in docs.iter().enumerate() {
            let row = index + 1;
            if !required && doc.is_all_blank() {
                tracing::debug!(field = name, row, "skipping blank row");
                continue;
            }
            match self.embedded.clean_document(doc, required) {
                Ok(item) => items.push(item),
                Err(item_errors) => errors.extend(item_errors.into_iter().map(|e| {
                    ValidationError::new(format!("Item {row}: {}", e.message), "invalid")
                        .with_param("item", row.to_string())
                })),
            }
        }

        if errors.is_empty() {
            Ok(Value::List(items))
        } else {
            Err(errors)
        }
    }
}

impl From<ListEmbeddedModelFormField> for FormFieldType {
    fn from(field: ListEmbeddedModelFormField) -> Self {
        Self::ListEmbedded(field)
    }
}
