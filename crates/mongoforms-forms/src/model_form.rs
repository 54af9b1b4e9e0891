//! Model-backed forms that auto-generate fields from document model metadata.
//!
//! [`formfield`] maps a single model [`FieldDef`] to its [`FormFieldDef`],
//! including the document fields: scalar lists, embedded models and lists of
//! embedded models. [`ModelFormConfig`] specifies how to generate a whole
//! form from a [`ModelMeta`], and [`generate_form_fields`] applies it.

use std::collections::HashMap;

use mongoforms_db::{DocumentModel, FieldDef, FieldType, ListFormStyle, ModelMeta, Value};

use crate::embedded::EmbeddedModelFormField;
use crate::fields::{FormFieldDef, FormFieldType};
use crate::list::{ListFormField, SimpleListFormField};
use crate::list_embedded::ListEmbeddedModelFormField;
use crate::widgets::WidgetType;

/// Configuration for generating a model-backed form.
///
/// Specifies which model fields to include/exclude and allows overriding
/// widgets, labels, and help texts for the generated form fields.
#[derive(Debug, Clone)]
pub struct ModelFormConfig {
    /// The model metadata to generate fields from.
    pub model_meta: &'static ModelMeta,
    /// Which model fields to include in the form.
    pub fields: ModelFormFields,
    /// Widget overrides keyed by field name.
    pub widgets: HashMap<String, WidgetType>,
    /// Label overrides keyed by field name.
    pub labels: HashMap<String, String>,
    /// Help text overrides keyed by field name.
    pub help_texts: HashMap<String, String>,
}

/// Specifies which model fields to include in a model form.
#[derive(Debug, Clone)]
pub enum ModelFormFields {
    /// Include all editable fields.
    All,
    /// Include only the specified fields.
    Include(Vec<String>),
    /// Include all fields except the specified ones.
    Exclude(Vec<String>),
}

impl ModelFormFields {
    fn includes(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Include(names) => names.iter().any(|n| n == name),
            Self::Exclude(names) => !names.iter().any(|n| n == name),
        }
    }
}

impl ModelFormConfig {
    /// Creates a new `ModelFormConfig` with all fields included.
    pub fn new(model_meta: &'static ModelMeta) -> Self {
        Self {
            model_meta,
            fields: ModelFormFields::All,
            widgets: HashMap::new(),
            labels: HashMap::new(),
            help_texts: HashMap::new(),
        }
    }

    /// Sets which fields to include.
    #[must_use]
    pub fn with_fields(mut self, fields: ModelFormFields) -> Self {
        self.fields = fields;
        self
    }

    /// Adds a widget override for a specific field.
    #[must_use]
    pub fn with_widget(mut self, field_name: impl Into<String>, widget: WidgetType) -> Self {
        self.widgets.insert(field_name.into(), widget);
        self
    }

    /// Adds a label override for a specific field.
    #[must_use]
    pub fn with_label(mut self, field_name: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(field_name.into(), label.into());
        self
    }

    /// Adds a help text override for a specific field.
    #[must_use]
    pub fn with_help_text(
        mut self,
        field_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.help_texts.insert(field_name.into(), text.into());
        self
    }
}

/// Builds the form field for a single model field.
///
/// The field is required unless the model field is nullable, may be blank,
/// or has a default. The label, help text, validators and initial value
/// (the default) are carried over from the model field.
pub fn formfield(model_field: &FieldDef) -> FormFieldDef {
    let mut field = FormFieldDef::new(model_field.name, model_field_to_form_field_type(model_field));
    field.required = model_field.is_required();
    field.label.clone_from(&model_field.verbose_name);
    field.help_text.clone_from(&model_field.help_text);
    field.validators.clone_from(&model_field.validators);
    field.initial.clone_from(&model_field.default);
    field
}

/// Builds the form fields for every editable, non-primary-key field of a
/// model, in declaration order.
pub fn fields_for_model(meta: &ModelMeta) -> Vec<FormFieldDef> {
    meta.form_fields().map(formfield).collect()
}

/// Generates form field definitions from a model form configuration.
///
/// Starts from [`fields_for_model`], keeps the fields selected by
/// `config.fields` and applies the widget, label and help text overrides.
pub fn generate_form_fields(config: &ModelFormConfig) -> Vec<FormFieldDef> {
    let mut form_fields: Vec<FormFieldDef> = config
        .model_meta
        .form_fields()
        .filter(|model_field| config.fields.includes(model_field.name))
        .map(formfield)
        .collect();

    if let ModelFormFields::Include(names) = &config.fields {
        form_fields.sort_by_key(|f| names.iter().position(|n| *n == f.name));
        for name in names {
            if config.model_meta.get_field(name).is_none() {
                tracing::warn!(
                    model = %config.model_meta.label(),
                    field = %name,
                    "unknown field in model form include list"
                );
            }
        }
    }

    for field in &mut form_fields {
        if let Some(widget) = config.widgets.get(&field.name) {
            field.widget = widget.clone();
        }
        if let Some(label) = config.labels.get(&field.name) {
            field.label.clone_from(label);
        }
        if let Some(help_text) = config.help_texts.get(&field.name) {
            field.help_text.clone_from(help_text);
        }
    }

    form_fields
}

/// Returns the initial form data for editing an existing document.
///
/// Only fields that appear on the generated form are included; document
/// fields keep their structured value, which the widgets prepare for
/// display.
pub fn initial_from_instance<M: DocumentModel>(instance: &M) -> HashMap<String, Value> {
    let meta = M::meta();
    instance
        .field_values()
        .into_iter()
        .filter(|(name, _)| {
            meta.get_field(name)
                .is_some_and(|f| f.editable && !f.primary_key)
        })
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Converts a model field type to a form field type.
fn model_field_to_form_field_type(field_def: &FieldDef) -> FormFieldType {
    if let Some(choices) = &field_def.choices {
        return FormFieldType::Choice {
            choices: choices
                .iter()
                .map(|(value, label)| (value.to_input_string().unwrap_or_default(), label.clone()))
                .collect(),
        };
    }
    match &field_def.field_type {
        FieldType::CharField | FieldType::TextField | FieldType::ObjectIdField => {
            FormFieldType::Char {
                min_length: None,
                max_length: field_def.max_length,
                strip: true,
            }
        }
        FieldType::IntegerField | FieldType::BigIntegerField => FormFieldType::Integer {
            min_value: None,
            max_value: None,
        },
        FieldType::FloatField => FormFieldType::Float {
            min_value: None,
            max_value: None,
        },
        FieldType::DecimalField {
            max_digits,
            decimal_places,
        } => FormFieldType::Decimal {
            max_digits: *max_digits,
            decimal_places: *decimal_places,
        },
        FieldType::BooleanField => FormFieldType::Boolean,
        FieldType::DateField => FormFieldType::Date,
        FieldType::DateTimeField => FormFieldType::DateTime,
        FieldType::TimeField => FormFieldType::Time,
        FieldType::UuidField => FormFieldType::Uuid,
        FieldType::EmailField => FormFieldType::Email,
        FieldType::UrlField => FormFieldType::Url,
        FieldType::SlugField => FormFieldType::Slug,
        FieldType::JsonField => FormFieldType::Json,
        FieldType::EmbeddedModelField { model } => EmbeddedModelFormField::new(model).into(),
        FieldType::ListField { item } => match item.as_ref() {
            FieldType::EmbeddedModelField { model } => {
                ListEmbeddedModelFormField::new(model).into()
            }
            _ => match field_def.list_style {
                ListFormStyle::Json => ListFormField::new().into(),
                ListFormStyle::CommaSeparated => SimpleListFormField::new().into(),
            },
        },
    }
}
