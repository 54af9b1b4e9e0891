//! Widgets for the scalar inputs a form field renders as.
//!
//! Every `<input>`-based widget is an [`Input`] whose `type` attribute
//! comes from its [`WidgetType`]. The widgets of the document fields live
//! in [`document_widgets`](crate::document_widgets); for reading submitted
//! data they behave like a hidden input.

use std::collections::HashMap;
use std::fmt;

use mongoforms_core::utils::html::{escape_html, render_attrs};
use mongoforms_core::QueryDict;

use crate::fields::{FormFieldDef, FormFieldType};

/// Enumerates all built-in widget types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetType {
    /// `<input type="text">`.
    TextInput,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="email">`.
    EmailInput,
    /// `<input type="url">`.
    UrlInput,
    /// `<input type="hidden">`.
    HiddenInput,
    /// `<textarea>`.
    Textarea,
    /// `<input type="checkbox">`.
    CheckboxInput,
    /// `<select>`.
    Select,
    /// `<input type="date">`.
    DateInput,
    /// `<input type="datetime-local">`.
    DateTimeInput,
    /// `<input type="time">`.
    TimeInput,
    /// One input per list item plus an add button.
    ListField,
    /// The sub-field inputs of an embedded document.
    EmbeddedModelField,
    /// A table with one row per embedded document.
    ListEmbeddedModelField,
}

impl WidgetType {
    /// The `type` attribute of the `<input>` this widget renders, if it
    /// renders one.
    ///
    /// Document widgets submit through a hidden input.
    pub const fn input_type(&self) -> Option<&'static str> {
        match self {
            Self::TextInput => Some("text"),
            Self::NumberInput => Some("number"),
            Self::EmailInput => Some("email"),
            Self::UrlInput => Some("url"),
            Self::DateInput => Some("date"),
            Self::DateTimeInput => Some("datetime-local"),
            Self::TimeInput => Some("time"),
            Self::HiddenInput
            | Self::ListField
            | Self::EmbeddedModelField
            | Self::ListEmbeddedModelField => Some("hidden"),
            Self::Textarea | Self::CheckboxInput | Self::Select => None,
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::TextInput => "TextInput",
            Self::NumberInput => "NumberInput",
            Self::EmailInput => "EmailInput",
            Self::UrlInput => "UrlInput",
            Self::HiddenInput => "HiddenInput",
            Self::Textarea => "Textarea",
            Self::CheckboxInput => "CheckboxInput",
            Self::Select => "Select",
            Self::DateInput => "DateInput",
            Self::DateTimeInput => "DateTimeInput",
            Self::TimeInput => "TimeInput",
            Self::ListField => "ListFieldWidget",
            Self::EmbeddedModelField => "EmbeddedModelFieldWidget",
            Self::ListEmbeddedModelField => "ListEmbeddedModelFieldWidget",
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A trait for HTML form widgets.
///
/// Widgets are `Send + Sync` so a form can be validated on any task.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the widget type enum variant.
    fn widget_type(&self) -> WidgetType;

    /// Renders the widget for `name` showing `value`, with extra `attrs`.
    fn render(&self, name: &str, value: &Option<String>, attrs: &HashMap<String, String>)
        -> String;

    /// Extracts the raw submitted value, `None` when nothing was sent.
    fn value_from_data(&self, data: &QueryDict, name: &str) -> Option<String> {
        data.get(name).map(String::from)
    }

    /// Returns the HTML `id` attribute value for a label targeting this widget.
    fn id_for_label(&self, id: &str) -> String {
        id.to_string()
    }
}

/// An `<input>` element of the type given by its [`WidgetType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    widget_type: WidgetType,
    input_type: &'static str,
}

impl Input {
    /// Creates the input for `widget_type`, falling back to a text input for
    /// types that do not render an `<input>`.
    pub const fn new(widget_type: WidgetType) -> Self {
        let input_type = match widget_type.input_type() {
            Some(input_type) => input_type,
            None => "text",
        };
        Self {
            widget_type,
            input_type,
        }
    }

    /// The hidden input document widgets carry their wire value in.
    pub const fn hidden() -> Self {
        Self::new(WidgetType::HiddenInput)
    }
}

impl Widget for Input {
    fn widget_type(&self) -> WidgetType {
        self.widget_type.clone()
    }

    fn render(
        &self,
        name: &str,
        value: &Option<String>,
        attrs: &HashMap<String, String>,
    ) -> String {
        let name = escape_html(name);
        format!(
            r#"<input type="{}" name="{name}" value="{}"{} />"#,
            self.input_type,
            escape_html(value.as_deref().unwrap_or("")),
            render_attrs(attrs)
        )
    }
}

/// A `<textarea>` widget.
#[derive(Debug, Clone)]
pub struct Textarea;

impl Widget for Textarea {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Textarea
    }

    fn render(
        &self,
        name: &str,
        value: &Option<String>,
        attrs: &HashMap<String, String>,
    ) -> String {
        let name = escape_html(name);
        format!(
            r#"<textarea name="{name}"{}>{}</textarea>"#,
            render_attrs(attrs),
            escape_html(value.as_deref().unwrap_or(""))
        )
    }
}

/// A `<input type="checkbox">` widget, checked for `true`, `on` or `1`.
#[derive(Debug, Clone)]
pub struct CheckboxInput;

impl Widget for CheckboxInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::CheckboxInput
    }

    fn render(
        &self,
        name: &str,
        value: &Option<String>,
        attrs: &HashMap<String, String>,
    ) -> String {
        let name = escape_html(name);
        let checked = matches!(value.as_deref(), Some("true" | "on" | "1"));
        format!(
            r#"<input type="checkbox" name="{name}"{}{} />"#,
            if checked { " checked" } else { "" },
            render_attrs(attrs)
        )
    }
}

/// A `<select>` over `(value, label)` choices.
#[derive(Debug, Clone)]
pub struct Select {
    /// The available choices as `(value, display_label)` pairs.
    pub choices: Vec<(String, String)>,
}

impl Select {
    /// Creates a new `Select` widget with the given choices.
    pub const fn new(choices: Vec<(String, String)>) -> Self {
        Self { choices }
    }

    fn render_options(&self, current: &str) -> String {
        let mut options = String::new();
        for (value, label) in &self.choices {
            options.push_str(&format!(r#"<option value="{}""#, escape_html(value)));
            if value == current {
                options.push_str(" selected");
            }
            options.push('>');
            options.push_str(&escape_html(label));
            options.push_str("</option>");
        }
        options
    }
}

impl Widget for Select {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Select
    }

    fn render(
        &self,
        name: &str,
        value: &Option<String>,
        attrs: &HashMap<String, String>,
    ) -> String {
        let name = escape_html(name);
        format!(
            r#"<select name="{name}"{}>{}</select>"#,
            render_attrs(attrs),
            self.render_options(value.as_deref().unwrap_or(""))
        )
    }
}

/// Creates a boxed widget from a `WidgetType`.
///
/// `Select` gets empty choices; use [`widget_for_field`] to populate them
/// from a field definition. The document widget types map to a hidden
/// [`Input`], which is what reads their submitted value.
pub fn create_widget(widget_type: &WidgetType) -> Box<dyn Widget> {
    create_widget_with_choices(widget_type, &[])
}

/// Creates a boxed widget from a `WidgetType`, populating choices if applicable.
pub fn create_widget_with_choices(
    widget_type: &WidgetType,
    choices: &[(String, String)],
) -> Box<dyn Widget> {
    match widget_type {
        WidgetType::Textarea => Box::new(Textarea),
        WidgetType::CheckboxInput => Box::new(CheckboxInput),
        WidgetType::Select => Box::new(Select::new(choices.to_vec())),
        WidgetType::ListField
        | WidgetType::EmbeddedModelField
        | WidgetType::ListEmbeddedModelField => Box::new(Input::hidden()),
        other => Box::new(Input::new(other.clone())),
    }
}

/// Creates the widget for a field definition, with the field's choices.
pub fn widget_for_field(field: &FormFieldDef) -> Box<dyn Widget> {
    match &field.field_type {
        FormFieldType::Choice { choices } => create_widget_with_choices(&field.widget, choices),
        FormFieldType::NullBoolean => create_widget_with_choices(
            &field.widget,
            &[
                ("unknown".to_string(), "Unknown".to_string()),
                ("true".to_string(), "Yes".to_string()),
                ("false".to_string(), "No".to_string()),
            ],
        ),
        _ => create_widget(&field.widget),
    }
}
