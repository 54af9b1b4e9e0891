//! The form field for a single embedded sub-document.
//!
//! The field is built from the embedded model's metadata. Its sub-field set
//! is generated with [`fields_for_model`], the same way a model form is, and
//! every sub-field validates its own slot of the submitted document.

use mongoforms_core::{FormsResult, ValidationError};
use mongoforms_db::{Document, ModelMeta, Value};

use crate::document_widgets::EmbeddedModelFieldWidget;
use crate::fields::{clean_input_value, FormFieldDef, FormFieldType};
use crate::model_form::fields_for_model;
use crate::wire;

/// The form field for an embedded-model field.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use mongoforms_db::{FieldDef, FieldType, ModelMeta, Value};
/// use mongoforms_forms::EmbeddedModelFormField;
///
/// static ADDRESS: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
///     app_label: "people",
///     model_name: "address",
///     verbose_name: "address".to_string(),
///     fields: vec![
///         FieldDef::new("street", FieldType::CharField),
///         FieldDef::new("number", FieldType::IntegerField),
///     ],
/// });
///
/// let field = EmbeddedModelFormField::new(&ADDRESS);
/// let cleaned = field
///     .clean("address", Some(r#"{"street":"Via Po","number":"3"}"#), true)
///     .unwrap();
/// let Value::Document(doc) = cleaned else { panic!("expected a document") };
/// assert_eq!(doc.get("number"), Some(&Value::Int(3)));
/// ```
#[derive(Debug, Clone)]
pub struct EmbeddedModelFormField {
    model: &'static ModelMeta,
    embedded_fields: Vec<FormFieldDef>,
    /// The widget used to render the sub-fields.
    pub widget: EmbeddedModelFieldWidget,
}

impl EmbeddedModelFormField {
    /// Creates the field for the given embedded model.
    pub fn new(model: &'static ModelMeta) -> Self {
        Self {
            model,
            embedded_fields: fields_for_model(model),
            widget: EmbeddedModelFieldWidget::default(),
        }
    }

    /// Replaces the widget.
    #[must_use]
    pub fn with_widget(mut self, widget: EmbeddedModelFieldWidget) -> Self {
        self.widget = widget;
        self
    }

    /// The embedded model.
    pub const fn model(&self) -> &'static ModelMeta {
        self.model
    }

    /// The sub-field set, in declaration order.
    pub fn embedded_fields(&self) -> &[FormFieldDef] {
        &self.embedded_fields
    }

    /// Returns a fresh copy of the sub-field set with each sub-field's
    /// initial taken from `value`.
    ///
    /// `value` may be `Null` (no initials), the hidden input's JSON string,
    /// or a document (a stored instance or an item of a decoded list). A key
    /// missing from the document leaves that sub-field without an initial.
    pub fn prepare_value(&self, name: &str, value: &Value) -> FormsResult<Vec<FormFieldDef>> {
        let doc = match value {
            Value::Null => return Ok(self.embedded_fields.clone()),
            Value::String(s) if s.is_empty() => return Ok(self.embedded_fields.clone()),
            Value::String(s) => wire::decode_document(name, s)?,
            Value::Document(doc) => doc.clone(),
            other => return Err(wire::unexpected(name, "a document", other)),
        };
        Ok(self.with_initials(&doc))
    }

    fn with_initials(&self, doc: &Document) -> Vec<FormFieldDef> {
        self.embedded_fields
            .iter()
            .cloned()
            .map(|mut field| {
                field.initial = doc.get(&field.name).cloned();
                field
            })
            .collect()
    }

    /// Decodes the hidden input into a document.
    pub fn to_python(&self, name: &str, raw: Option<&str>) -> Result<Document, ValidationError> {
        match raw {
            None | Some("") => Ok(Document::new()),
            Some(raw) => wire::decode_document(name, raw).map_err(|e| wire::invalid_input(&e)),
        }
    }

    /// Accepts an already-decoded value, as found in a list of documents.
    pub fn to_python_value(&self, name: &str, value: Value) -> Result<Document, ValidationError> {
        match value {
            Value::Document(doc) => Ok(doc),
            Value::Null => Ok(Document::new()),
            Value::String(s) => self.to_python(name, Some(s.as_str())),
            other => Err(wire::invalid_input(&wire::unexpected(
                name,
                "a document",
                &other,
            ))),
        }
    }

    /// Fails with `required` when every submitted sub-value is blank.
    pub fn validate(&self, doc: &Document, required: bool) -> Result<(), ValidationError> {
        if required && doc.is_all_blank() {
            return Err(ValidationError::required());
        }
        Ok(())
    }

    /// Cleans every sub-field from its slot in `doc`.
    ///
    /// When the field is optional and nothing was filled in, the document
    /// cleans to `Null`. Keys that are not sub-fields are dropped; the
    /// cleaned document holds exactly the sub-fields, in order. Sub-field
    /// errors are reported as `"<label>: <message>"`.
    pub fn clean_document(
        &self,
        doc: &Document,
        required: bool,
    ) -> Result<Value, Vec<ValidationError>> {
        self.validate(doc, required).map_err(|e| vec![e])?;
        if !required && doc.is_all_blank() {
            return Ok(Value::Null);
        }

        for key in doc.keys() {
            if !self.embedded_fields.iter().any(|f| f.name == key) {
                tracing::debug!(
                    model = %self.model.label(),
                    key,
                    "dropping unknown sub-document key"
                );
            }
        }

        let mut cleaned = Document::new();
        let mut errors = Vec::new();
        for field in &self.embedded_fields {
            let value = doc.get(&field.name).cloned().unwrap_or(Value::Null);
            match clean_input_value(field, &value) {
                Ok(value) => {
                    cleaned.insert(field.name.clone(), value);
                }
                Err(messages) => errors.extend(messages.into_iter().map(|msg| {
                    ValidationError::new(format!("{}: {msg}", field.label), "invalid")
                        .with_param("field", field.name.clone())
                })),
            }
        }

        if errors.is_empty() {
            Ok(Value::Document(cleaned))
        } else {
            Err(errors)
        }
    }

    /// Decodes the hidden input and cleans every sub-field.
    pub fn clean(
        &self,
        name: &str,
        raw: Option<&str>,
        required: bool,
    ) -> Result<Value, Vec<ValidationError>> {
        let doc = self.to_python(name, raw).map_err(|e| vec![e])?;
        self.clean_document(&doc, required)
    }
}

impl From<EmbeddedModelFormField> for FormFieldType {
    fn from(field: EmbeddedModelFormField) -> Self {
        Self::Embedded(field)
    }
}
