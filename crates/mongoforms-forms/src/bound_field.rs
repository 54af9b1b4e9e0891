//! Bound fields: form fields populated with data and errors.
//!
//! A [`BoundField`] represents the combination of a form field definition,
//! its current data value, any validation errors, and the widget used for
//! rendering. Document fields are rendered by their own widgets: the bound
//! data is the wire string from the hidden input, the unbound initial is the
//! structured value read from the model instance.

use std::collections::HashMap;

use mongoforms_core::utils::html::escape_html;
use mongoforms_db::Value;

use crate::document_widgets::Media;
use crate::fields::{FormFieldDef, FormFieldType};
use crate::widgets::{self, Widget, WidgetType};
use crate::wire;

/// A form field bound to data and validation state.
///
/// `BoundField` is created during form rendering to pair a field definition
/// with its current value, errors, and widget.
pub struct BoundField {
    /// The field's HTML name attribute.
    pub name: String,
    /// Owned snapshot of the field definition.
    pub field: BoundFieldDef,
    /// The raw data value submitted for this field.
    pub data: Option<String>,
    /// The initial value shown when the form is unbound.
    pub initial: Option<Value>,
    /// Validation error messages for this field.
    pub errors: Vec<String>,
    /// The widget instance used for scalar rendering.
    pub widget: Box<dyn Widget>,
}

/// Minimal field definition snapshot stored in a `BoundField`.
#[derive(Debug, Clone)]
pub struct BoundFieldDef {
    /// The field name.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Help text.
    pub help_text: String,
    /// Whether the field is required.
    pub required: bool,
    /// Whether the field is disabled.
    pub disabled: bool,
    /// The field type, which carries the document widgets.
    pub field_type: FormFieldType,
    /// The widget type selected for the field.
    pub widget_type: WidgetType,
}

impl BoundField {
    /// Creates a new `BoundField` from a field definition and current state.
    ///
    /// The field's own initial value is used until [`with_initial`](Self::with_initial)
    /// replaces it.
    pub fn new(
        field_def: &FormFieldDef,
        data: Option<String>,
        errors: Vec<String>,
        prefix: Option<&str>,
    ) -> Self {
        let html_name = match prefix {
            Some(p) => format!("{p}-{}", field_def.name),
            None => field_def.name.clone(),
        };

        Self {
            name: html_name,
            field: BoundFieldDef {
                name: field_def.name.clone(),
                label: field_def.label.clone(),
                help_text: field_def.help_text.clone(),
                required: field_def.required,
                disabled: field_def.disabled,
                field_type: field_def.field_type.clone(),
                widget_type: field_def.widget.clone(),
            },
            data,
            initial: field_def.initial.clone(),
            errors,
            widget: widgets::widget_for_field(field_def),
        }
    }

    /// Replaces the initial value, if one is given.
    #[must_use]
    pub fn with_initial(mut self, initial: Option<Value>) -> Self {
        if initial.is_some() {
            self.initial = initial;
        }
        self
    }

    /// The value to display: the submitted string when bound, otherwise the
    /// initial value.
    fn value(&self) -> Value {
        match (&self.data, &self.initial) {
            (Some(data), _) => Value::String(data.clone()),
            (None, Some(initial)) => initial.clone(),
            (None, None) => Value::Null,
        }
    }

    /// Renders the widget HTML for this bound field.
    pub fn render(&self, extra_attrs: &HashMap<String, String>) -> String {
        let mut attrs = extra_attrs.clone();
        let id = self.auto_id();
        if !id.is_empty() {
            attrs.entry("id".to_string()).or_insert(id);
        }
        if self.field.disabled {
            attrs.insert("disabled".to_string(), "disabled".to_string());
        }

        let value = self.value();
        match (&self.field.field_type, &self.field.widget_type) {
            (FormFieldType::List(list), WidgetType::ListField) => {
                let items = list
                    .prepare_value(&self.field.name, &value)
                    .unwrap_or_else(|e| {
                        tracing::warn!(field = %self.name, error = %e, "rendering blank list");
                        vec![String::new()]
                    });
                list.widget.render(&self.name, &items, &attrs)
            }
            (FormFieldType::Embedded(embedded), WidgetType::EmbeddedModelField) => {
                let fields = embedded
                    .prepare_value(&self.field.name, &value)
                    .unwrap_or_else(|e| {
                        tracing::warn!(field = %self.name, error = %e, "rendering blank document");
                        embedded.embedded_fields().to_vec()
                    });
                embedded.widget.render(&self.name, &fields, &attrs)
            }
            (FormFieldType::ListEmbedded(list), WidgetType::ListEmbeddedModelField) => {
                let rows = list
                    .prepare_value(&self.field.name, &value)
                    .unwrap_or_else(|e| {
                        tracing::warn!(field = %self.name, error = %e, "rendering blank row");
                        vec![list.embedded_field().embedded_fields().to_vec()]
                    });
                list.widget.render(&self.name, &rows, &attrs)
            }
            _ => self
                .widget
                .render(&self.name, &self.display_string(&value), &attrs),
        }
    }

    /// The string shown by a plain widget.
    ///
    /// Document values shown in a plain widget use their wire encoding.
    fn display_string(&self, value: &Value) -> Option<String> {
        match (&self.field.field_type, value) {
            (FormFieldType::SimpleList(list), value) => Some(list.prepare_value(value)),
            (_, Value::List(_) | Value::Document(_)) => Some(wire::encode(value)),
            (_, value) => value.to_input_string(),
        }
    }

    /// The scripts and stylesheets this field's widget needs.
    pub fn media(&self) -> Media {
        match &self.field.field_type {
            FormFieldType::List(list) => list.widget.media(),
            FormFieldType::Embedded(embedded) => embedded.widget.media(),
            FormFieldType::ListEmbedded(list) => list.widget.media(),
            _ => Media::new(),
        }
    }

    /// Renders a `<label>` element for this field.
    pub fn label_tag(&self) -> String {
        let id = self.auto_id();
        let label_id = self.widget.id_for_label(&id);
        let label = escape_html(&self.field.label);
        if label_id.is_empty() {
            format!("<label>{label}</label>")
        } else {
            format!(r#"<label for="{label_id}">{label}</label>"#)
        }
    }

    /// Returns the auto-generated HTML `id` for this field.
    pub fn auto_id(&self) -> String {
        format!("id_{}", self.name)
    }

    /// Returns `true` if this field has any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Renders the error list as an HTML `<ul>` element.
    pub fn errors_as_ul(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        let items: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("<li>{}</li>", escape_html(e)))
            .collect();
        format!(r#"<ul class="errorlist">{}</ul>"#, items.join(""))
    }
}
