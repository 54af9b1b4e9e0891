//! # mongoforms
//!
//! Form fields and widgets for document models whose fields hold lists,
//! embedded sub-documents, or lists of embedded sub-documents.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on
//! `mongoforms` to get everything, or on the individual crates for
//! finer-grained control.
//!
//! ```
//! use std::sync::LazyLock;
//!
//! use mongoforms::prelude::*;
//!
//! static POINT: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
//!     app_label: "geo",
//!     model_name: "point",
//!     verbose_name: "point".to_string(),
//!     fields: vec![
//!         FieldDef::new("x", FieldType::IntegerField),
//!         FieldDef::new("y", FieldType::IntegerField),
//!     ],
//! });
//!
//! let field = formfield(&FieldDef::new("at", FieldType::embedded(&POINT)));
//! let cleaned = clean_field_value(&field, Some(r#"{"x":"1","y":"2"}"#)).unwrap();
//! let Value::Document(doc) = cleaned else { panic!() };
//! assert_eq!(doc.get("y"), Some(&Value::Int(2)));
//! ```

/// Core types: settings, errors, logging, and submitted form data.
pub use mongoforms_core as core;

/// Document values, model field definitions, and validators.
pub use mongoforms_db as db;

/// Form fields, widgets, and model forms.
#[cfg(feature = "forms")]
pub use mongoforms_forms as forms;

pub use async_trait::async_trait;
pub use serde_json;
pub use tracing;

/// The types needed to declare a document model and build its form.
pub mod prelude {
    pub use mongoforms_core::{
        FormsError, FormsResult, QueryDict, Settings, ValidationError, SETTINGS,
    };
    pub use mongoforms_db::{
        Document, DocumentModel, FieldDef, FieldType, ListFormStyle, ModelMeta, Value,
    };

    #[cfg(feature = "forms")]
    pub use mongoforms_forms::{
        clean_field_value, fields_for_model, formfield, generate_form_fields,
        initial_from_instance, BaseForm, EmbeddedModelFieldWidget, EmbeddedModelFormField, Form,
        FormFieldDef, FormFieldType, ListEmbeddedModelFieldWidget, ListEmbeddedModelFormField,
        ListFieldWidget, ListFormField, Media, ModelFormConfig, ModelFormFields,
        SimpleListFormField,
    };
}
