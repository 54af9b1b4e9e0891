//! Validation pipeline for form processing.
//!
//! 1. Field-level validation: type coercion and per-field validators. For
//!    document fields this decodes the hidden input and cleans every
//!    sub-field of every item.
//! 2. Form-level cross-field validation (async).
//!
//! Errors accumulate rather than short-circuiting, so all validation
//! issues are reported at once.

use std::collections::HashMap;

use mongoforms_db::Value;

use crate::fields::{clean_field_value, FormFieldDef};
use crate::form::Form;

/// Performs field-level validation for all fields.
///
/// For each field definition the raw value is looked up in `raw_data` and
/// passed to [`clean_field_value`]; the result lands in `cleaned_data` or
/// `errors`. Disabled fields keep their initial value.
pub fn clean_fields(
    field_defs: &[FormFieldDef],
    raw_data: &HashMap<String, Option<String>>,
    cleaned_data: &mut HashMap<String, Value>,
    errors: &mut HashMap<String, Vec<String>>,
) {
    for field in field_defs {
        if field.disabled {
            if let Some(initial) = &field.initial {
                cleaned_data.insert(field.name.clone(), initial.clone());
            }
            continue;
        }

        let raw = raw_data.get(&field.name).and_then(|v| v.as_deref());

        match clean_field_value(field, raw) {
            Ok(value) => {
                cleaned_data.insert(field.name.clone(), value);
            }
            Err(field_errors) => {
                errors.insert(field.name.clone(), field_errors);
            }
        }
    }
}

/// Performs the full validation pipeline: field-level then form-level.
///
/// # Errors
///
/// Returns the `(field_name, messages)` pairs, sorted by field name, when
/// the form is invalid.
pub async fn full_clean(form: &mut dyn Form) -> Result<(), Vec<(String, Vec<String>)>> {
    if form.is_valid().await {
        Ok(())
    } else {
        let mut errors: Vec<(String, Vec<String>)> = form
            .errors()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        errors.sort_by(|a, b| a.0.cmp(&b.0));
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use mongoforms_core::QueryDict;
    use mongoforms_db::{Document, FieldDef, FieldType, ModelMeta};

    use super::*;
    use crate::embedded::EmbeddedModelFormField;
    use crate::fields::FormFieldType;
    use crate::form::BaseForm;
    use crate::list::ListFormField;

    static SIZE: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
        app_label: "shop",
        model_name: "size",
        verbose_name: "size".to_string(),
        fields: vec![
            FieldDef::new("width", FieldType::IntegerField),
            FieldDef::new("height", FieldType::IntegerField),
        ],
    });

    fn char_field(name: &str) -> FormFieldDef {
        FormFieldDef::new(
            name,
            FormFieldType::Char {
                min_length: None,
                max_length: None,
                strip: false,
            },
        )
    }

    #[test]
    fn test_clean_fields_errors_accumulate() {
        let fields = vec![
            char_field("name"),
            FormFieldDef::new("size", EmbeddedModelFormField::new(&SIZE).into()),
        ];
        let mut raw = HashMap::new();
        raw.insert("name".to_string(), None);
        raw.insert(
            "size".to_string(),
            Some(r#"{"width":"a","height":"b"}"#.to_string()),
        );

        let mut cleaned = HashMap::new();
        let mut errors = HashMap::new();
        clean_fields(&fields, &raw, &mut cleaned, &mut errors);

        assert!(errors.contains_key("name"));
        assert_eq!(errors["size"].len(), 2);
        assert!(errors["size"][0].starts_with("width: "));
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_clean_fields_document_values() {
        let fields = vec![
            FormFieldDef::new("size", EmbeddedModelFormField::new(&SIZE).into()),
            FormFieldDef::new("colors", ListFormField::new().into()).required(false),
        ];
        let mut raw = HashMap::new();
        raw.insert(
            "size".to_string(),
            Some(r#"{"width":"10","height":"20"}"#.to_string()),
        );

        let mut cleaned = HashMap::new();
        let mut errors = HashMap::new();
        clean_fields(&fields, &raw, &mut cleaned, &mut errors);

        assert!(errors.is_empty());
        let mut size = Document::new();
        size.insert("width", Value::Int(10));
        size.insert("height", Value::Int(20));
        assert_eq!(cleaned["size"], Value::Document(size));
        assert_eq!(cleaned["colors"], Value::List(vec![]));
    }

    #[test]
    fn test_clean_fields_disabled_uses_initial() {
        let tags = Value::List(vec![Value::from("fixed")]);
        let fields = vec![FormFieldDef::new("tags", ListFormField::new().into())
            .disabled(true)
            .initial(tags.clone())];

        let mut raw = HashMap::new();
        raw.insert("tags".to_string(), Some(r#"["tampered"]"#.to_string()));
        let mut cleaned = HashMap::new();
        let mut errors = HashMap::new();
        clean_fields(&fields, &raw, &mut cleaned, &mut errors);

        assert!(errors.is_empty());
        assert_eq!(cleaned.get("tags"), Some(&tags));
    }

    #[test]
    fn test_clean_fields_optional_missing() {
        let fields = vec![char_field("bio").required(false)];
        let raw = HashMap::new();
        let mut cleaned = HashMap::new();
        let mut errors = HashMap::new();
        clean_fields(&fields, &raw, &mut cleaned, &mut errors);

        assert!(errors.is_empty());
        assert!(cleaned.contains_key("bio"));
    }

    #[tokio::test]
    async fn test_full_clean_valid() {
        let mut form = BaseForm::new(vec![char_field("name")]);
        form.bind(&QueryDict::parse("name=Alice"));
        assert!(full_clean(&mut form).await.is_ok());
    }

    #[tokio::test]
    async fn test_full_clean_invalid_sorted() {
        let mut form = BaseForm::new(vec![char_field("zeta"), char_field("alpha")]);
        form.bind(&QueryDict::parse(""));

        let errors = full_clean(&mut form).await.unwrap_err();
        let names: Vec<&str> = errors.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
