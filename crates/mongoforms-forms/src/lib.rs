//! # mongoforms-forms
//!
//! Form fields and widgets for document models. Besides the usual scalar
//! fields this crate provides the three document fields:
//!
//! - [`ListFormField`] / [`SimpleListFormField`] for scalar lists,
//! - [`EmbeddedModelFormField`] for a single embedded sub-document,
//! - [`ListEmbeddedModelFormField`] for a list of embedded sub-documents.
//!
//! Each converts between the JSON string carried by a hidden input and the
//! structured [`Value`](mongoforms_db::Value) stored on the model, and
//! delegates validation to the sub-fields generated from the embedded model.

pub mod bound_field;
pub mod document_widgets;
pub mod embedded;
pub mod fields;
pub mod form;
pub mod list;
pub mod list_embedded;
pub mod model_form;
pub mod validation;
pub mod widgets;
pub mod wire;

pub use bound_field::BoundField;
pub use document_widgets::{
    EmbeddedModelFieldWidget, ListEmbeddedModelFieldWidget, ListFieldWidget, Media,
};
pub use embedded::EmbeddedModelFormField;
pub use fields::{clean_field_value, clean_input_value, FormFieldDef, FormFieldType};
pub use form::{BaseForm, Form};
pub use list::{ListFormField, SimpleListFormField};
pub use list_embedded::ListEmbeddedModelFormField;
pub use model_form::{
    fields_for_model, formfield, generate_form_fields, initial_from_instance, ModelFormConfig,
    ModelFormFields,
};
pub use widgets::{Widget, WidgetType};
