//! Document model trait and metadata.
//!
//! The [`DocumentModel`] trait is implemented by every struct that is stored
//! as a document or embedded inside one. [`ModelMeta`] carries the model's
//! labels and ordered field definitions, which is all the form layer needs to
//! build a form for it.

use crate::document::Document;
use crate::fields::FieldDef;
use crate::value::Value;

/// The trait for document models.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use mongoforms_db::model::{DocumentModel, ModelMeta};
/// use mongoforms_db::fields::{FieldDef, FieldType};
/// use mongoforms_db::value::Value;
///
/// struct Address {
///     street: String,
///     number: i64,
/// }
///
/// impl DocumentModel for Address {
///     fn meta() -> &'static ModelMeta {
///         static META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
///             app_label: "people",
///             model_name: "address",
///             verbose_name: "address".to_string(),
///             fields: vec![
///                 FieldDef::new("street", FieldType::CharField),
///                 FieldDef::new("number", FieldType::IntegerField),
///             ],
///         });
///         &META
///     }
///
///     fn field_values(&self) -> Vec<(&'static str, Value)> {
///         vec![
///             ("street", Value::from(self.street.as_str())),
///             ("number", Value::Int(self.number)),
///         ]
///     }
/// }
///
/// let doc = Address { street: "Via Roma".into(), number: 3 }.to_document();
/// assert_eq!(doc.get("number"), Some(&Value::Int(3)));
/// ```
pub trait DocumentModel: Send + Sync + 'static {
    /// Returns the static metadata for this model type.
    fn meta() -> &'static ModelMeta
    where
        Self: Sized;

    /// Returns all field name-value pairs for this instance.
    fn field_values(&self) -> Vec<(&'static str, Value)>;

    /// Returns the instance as an ordered sub-document.
    fn to_document(&self) -> Document {
        self.field_values().into_iter().collect()
    }
}

/// Metadata about a document model.
#[derive(Debug)]
pub struct ModelMeta {
    /// The application label (e.g., "people").
    pub app_label: &'static str,
    /// The model name in lowercase (e.g., "address").
    pub model_name: &'static str,
    /// Human-readable singular name.
    pub verbose_name: String,
    /// Field definitions for this model, in declaration order.
    pub fields: Vec<FieldDef>,
}

impl ModelMeta {
    /// Looks up a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the fields that appear in generated forms: editable and not
    /// the primary key, in declaration order.
    pub fn form_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.editable && !f.primary_key)
    }

    /// Returns the `app_label.model_name` label.
    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldType;

    fn meta() -> ModelMeta {
        ModelMeta {
            app_label: "people",
            model_name: "person",
            verbose_name: "person".to_string(),
            fields: vec![
                FieldDef::new("id", FieldType::ObjectIdField).primary_key(),
                FieldDef::new("name", FieldType::CharField),
                FieldDef::new("created", FieldType::DateTimeField).not_editable(),
                FieldDef::new("tags", FieldType::list(FieldType::CharField)),
            ],
        }
    }

    #[test]
    fn test_get_field() {
        let meta = meta();
        assert!(meta.get_field("name").is_some());
        assert!(meta.get_field("missing").is_none());
    }

    #[test]
    fn test_form_fields_skips_pk_and_non_editable() {
        let meta = meta();
        let names: Vec<_> = meta.form_fields().map(|f| f.name).collect();
        assert_eq!(names, vec!["name", "tags"]);
    }

    #[test]
    fn test_label() {
        assert_eq!(meta().label(), "people.person");
    }

    struct Tag(&'static str);

    impl DocumentModel for Tag {
        fn meta() -> &'static ModelMeta {
            unimplemented!()
        }

        fn field_values(&self) -> Vec<(&'static str, Value)> {
            vec![("label", Value::from(self.0)), ("weight", Value::Int(1))]
        }
    }

    #[test]
    fn test_to_document_keeps_order() {
        let doc = Tag("rust").to_document();
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["label", "weight"]);
    }
}
