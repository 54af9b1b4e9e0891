//! Form trait and `BaseForm` implementation.
//!
//! The [`Form`] trait is the core abstraction for all form types. It supports
//! async validation (for uniqueness checks and other I/O-bound validation)
//! and data binding from [`QueryDict`].
//!
//! [`BaseForm`] provides a concrete, general-purpose implementation of the
//! `Form` trait that can be constructed from a list of field definitions,
//! typically the ones generated for a document model.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::Instrument;

use mongoforms_core::logging::form_span;
use mongoforms_core::utils::html::escape_html;
use mongoforms_core::QueryDict;
use mongoforms_db::{Document, Value};

use crate::bound_field::BoundField;
use crate::document_widgets::Media;
use crate::fields::FormFieldDef;
use crate::validation;
use crate::widgets::widget_for_field;

/// Key under which form-level errors are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// The core form trait. All form types implement this.
///
/// `is_valid()` and `clean()` are async because cross-field validation
/// commonly requires database access. All implementations must be
/// `Send + Sync` to work across async task boundaries.
#[async_trait]
pub trait Form: Send + Sync {
    /// Returns the form's field definitions.
    fn fields(&self) -> &[FormFieldDef];

    /// Returns the initial (default) values for fields.
    fn initial(&self) -> &HashMap<String, Value>;

    /// Returns the form prefix (for namespacing multiple forms on one page).
    fn prefix(&self) -> Option<&str>;

    /// Binds raw form data to this form.
    fn bind(&mut self, data: &QueryDict);

    /// Returns `true` if this form has been bound to data.
    fn is_bound(&self) -> bool;

    /// Validates the form asynchronously. Returns `true` if valid.
    ///
    /// After calling this, `errors()` and `cleaned_data()` are populated.
    async fn is_valid(&mut self) -> bool;

    /// Returns per-field validation errors.
    ///
    /// Keys are field names, values are lists of error messages.
    fn errors(&self) -> &HashMap<String, Vec<String>>;

    /// Returns the cleaned (validated and coerced) data.
    ///
    /// List fields clean to `Value::List`, embedded fields to
    /// `Value::Document`.
    fn cleaned_data(&self) -> &HashMap<String, Value>;

    /// Cross-field validation hook. Override to add form-level validation.
    ///
    /// The default implementation does nothing.
    async fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
        Ok(())
    }
}

/// A general-purpose form implementation.
///
/// `BaseForm` holds a list of field definitions and manages binding,
/// validation, cleaned data and HTML rendering.
pub struct BaseForm {
    field_defs: Vec<FormFieldDef>,
    initial_data: HashMap<String, Value>,
    prefix: Option<String>,
    bound: bool,
    raw_data: HashMap<String, Option<String>>,
    errors: HashMap<String, Vec<String>>,
    cleaned_data: HashMap<String, Value>,
}

impl BaseForm {
    /// Creates a new `BaseForm` with the given field definitions.
    pub fn new(fields: Vec<FormFieldDef>) -> Self {
        Self {
            field_defs: fields,
            initial_data: HashMap::new(),
            prefix: None,
            bound: false,
            raw_data: HashMap::new(),
            errors: HashMap::new(),
            cleaned_data: HashMap::new(),
        }
    }

    /// Sets initial values for fields, e.g. from
    /// [`initial_from_instance`](crate::model_form::initial_from_instance).
    #[must_use]
    pub fn with_initial(mut self, initial: HashMap<String, Value>) -> Self {
        self.initial_data = initial;
        self
    }

    /// Sets the form prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    fn html_name(&self, field: &FormFieldDef) -> String {
        match &self.prefix {
            Some(p) => format!("{p}-{}", field.name),
            None => field.name.clone(),
        }
    }

    /// Returns bound fields for rendering.
    ///
    /// Unbound forms show the form's initial data, falling back to each
    /// field's own initial value.
    pub fn bound_fields(&self) -> Vec<BoundField> {
        self.field_defs
            .iter()
            .map(|field| {
                let data = self.raw_data.get(&field.name).cloned().flatten();
                let errors = self.errors.get(&field.name).cloned().unwrap_or_default();
                let initial = if self.bound {
                    None
                } else {
                    self.initial_data.get(&field.name).cloned()
                };
                BoundField::new(field, data, errors, self.prefix.as_deref()).with_initial(initial)
            })
            .collect()
    }

    /// Returns the non-field (form-level) errors.
    pub fn non_field_errors(&self) -> &[String] {
        self.errors
            .get(NON_FIELD_ERRORS)
            .map_or(&[], Vec::as_slice)
    }

    /// The scripts and stylesheets needed by all widgets of the form.
    pub fn media(&self) -> Media {
        let mut media = Media::new();
        for field in &self.field_defs {
            media.merge(&field.media());
        }
        media
    }

    /// The cleaned data as a document, in field order.
    ///
    /// Returns `None` until the form has been validated successfully.
    pub fn cleaned_document(&self) -> Option<Document> {
        if !self.bound || !self.errors.is_empty() || self.cleaned_data.is_empty() {
            return None;
        }
        Some(
            self.field_defs
                .iter()
                .filter_map(|field| {
                    self.cleaned_data
                        .get(&field.name)
                        .map(|value| (field.name.clone(), value.clone()))
                })
                .collect(),
        )
    }

    /// Renders the form as a sequence of `<p>` rows.
    pub fn as_p(&self) -> String {
        let mut rows = Vec::new();
        if !self.non_field_errors().is_empty() {
            let items: String = self
                .non_field_errors()
                .iter()
                .map(|e| format!("<li>{}</li>", escape_html(e)))
                .collect();
            rows.push(format!(r#"<ul class="errorlist nonfield">{items}</ul>"#));
        }
        for bf in self.bound_fields() {
            let help = if bf.field.help_text.is_empty() {
                String::new()
            } else {
                format!(
                    r#" <span class="helptext">{}</span>"#,
                    escape_html(&bf.field.help_text)
                )
            };
            rows.push(format!(
                "{}<p>{} {}{help}</p>",
                bf.errors_as_ul(),
                bf.label_tag(),
                bf.render(&HashMap::new())
            ));
        }
        rows.join("\n")
    }
}

#[async_trait]
impl Form for BaseForm {
    fn fields(&self) -> &[FormFieldDef] {
        &self.field_defs
    }

    fn initial(&self) -> &HashMap<String, Value> {
        &self.initial_data
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn bind(&mut self, data: &QueryDict) {
        self.bound = true;
        self.raw_data.clear();
        self.errors.clear();
        self.cleaned_data.clear();

        let values: Vec<(String, Option<String>)> = self
            .field_defs
            .iter()
            .map(|field| {
                let value = widget_for_field(field).value_from_data(data, &self.html_name(field));
                (field.name.clone(), value)
            })
            .collect();
        self.raw_data.extend(values);
    }

    fn is_bound(&self) -> bool {
        self.bound
    }

    async fn is_valid(&mut self) -> bool {
        if !self.bound {
            return false;
        }

        self.errors.clear();
        self.cleaned_data.clear();

        let span = form_span(self.prefix.as_deref());
        span.in_scope(|| {
            validation::clean_fields(
                &self.field_defs,
                &self.raw_data,
                &mut self.cleaned_data,
                &mut self.errors,
            );
        });

        if let Err(form_errors) = self.clean().instrument(span.clone()).await {
            for (key, msgs) in form_errors {
                self.errors.entry(key).or_default().extend(msgs);
            }
        }

        if !self.errors.is_empty() {
            span.in_scope(|| {
                tracing::debug!(
                    fields = ?self.errors.keys().collect::<Vec<_>>(),
                    "form validation failed"
                );
            });
        }
        self.errors.is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        &self.cleaned_data
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use mongoforms_db::{FieldDef, FieldType, ModelMeta};

    use super::*;
    use crate::fields::FormFieldType;
    use crate::model_form::fields_for_model;

    static TAG: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
        app_label: "blog",
        model_name: "tag",
        verbose_name: "tag".to_string(),
        fields: vec![
            FieldDef::new("name", FieldType::CharField),
            FieldDef::new("weight", FieldType::IntegerField).nullable(),
        ],
    });

    static POST: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
        app_label: "blog",
        model_name: "post",
        verbose_name: "post".to_string(),
        fields: vec![
            FieldDef::new("title", FieldType::CharField).verbose_name("Title"),
            FieldDef::new("keywords", FieldType::list(FieldType::CharField)).blank(),
            FieldDef::new("main_tag", FieldType::embedded(&TAG)),
            FieldDef::new("tags", FieldType::list_of_embedded(&TAG)).blank(),
        ],
    });

    fn make_test_form() -> BaseForm {
        BaseForm::new(vec![
            FormFieldDef::new(
                "username",
                FormFieldType::Char {
                    min_length: Some(3),
                    max_length: Some(20),
                    strip: true,
                },
            ),
            FormFieldDef::new("email", FormFieldType::Email),
            FormFieldDef::new(
                "age",
                FormFieldType::Integer {
                    min_value: Some(0),
                    max_value: Some(150),
                },
            )
            .required(false),
        ])
    }

    fn post_data(pairs: &[(&str, &str)]) -> QueryDict {
        let mut qd = QueryDict::new_mutable();
        for (key, value) in pairs {
            qd.set(key, value).unwrap();
        }
        qd
    }

    #[tokio::test]
    async fn test_form_unbound() {
        let mut form = make_test_form();
        assert!(!form.is_bound());
        assert!(!form.is_valid().await);
        assert!(form.cleaned_document().is_none());
    }

    #[tokio::test]
    async fn test_form_bind_and_validate() {
        let mut form = make_test_form();
        let qd = QueryDict::parse("username=alice&email=alice@example.com&age=30");
        form.bind(&qd);
        assert!(form.is_bound());
        assert!(form.is_valid().await);
        assert_eq!(
            form.cleaned_data().get("username"),
            Some(&Value::String("alice".to_string()))
        );
        assert_eq!(form.cleaned_data().get("age"), Some(&Value::Int(30)));
    }

    #[tokio::test]
    async fn test_form_validation_errors() {
        let mut form = make_test_form();
        form.bind(&QueryDict::parse("username=ab&email=not-email"));
        assert!(!form.is_valid().await);
        assert!(form.errors().contains_key("username"));
        assert!(form.errors().contains_key("email"));
    }

    #[tokio::test]
    async fn test_form_with_prefix() {
        let mut form = make_test_form().with_prefix("myform");
        assert_eq!(form.prefix(), Some("myform"));
        form.bind(&QueryDict::parse(
            "myform-username=alice&myform-email=alice@example.com&myform-age=25",
        ));
        assert!(form.is_valid().await);
        assert_eq!(form.bound_fields()[0].name, "myform-username");
    }

    #[tokio::test]
    async fn test_bind_reads_prefixed_widget_values() {
        let mut form = BaseForm::new(vec![
            FormFieldDef::new(
                "username",
                FormFieldType::Char {
                    min_length: None,
                    max_length: None,
                    strip: true,
                },
            ),
            FormFieldDef::new("active", FormFieldType::Boolean).required(false),
        ])
        .with_prefix("p");
        form.bind(&QueryDict::parse(
            "username=ignored&p-username=first&p-username=last&p-active=on",
        ));
        assert!(form.is_valid().await);
        assert_eq!(form.cleaned_data().get("username"), Some(&Value::from("last")));
        assert_eq!(form.cleaned_data().get("active"), Some(&Value::Bool(true)));
    }

    #[tokio::test]
    async fn test_form_rebind_clears_state() {
        let mut form = make_test_form();
        form.bind(&QueryDict::parse("username=ab"));
        assert!(!form.is_valid().await);
        assert!(!form.errors().is_empty());

        form.bind(&QueryDict::parse("username=alice&email=alice@example.com"));
        assert!(form.is_valid().await);
        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn test_form_level_clean_errors() {
        struct NoAdmin(BaseForm);

        #[async_trait]
        impl Form for NoAdmin {
            fn fields(&self) -> &[FormFieldDef] {
                self.0.fields()
            }
            fn initial(&self) -> &HashMap<String, Value> {
                self.0.initial()
            }
            fn prefix(&self) -> Option<&str> {
                self.0.prefix()
            }
            fn bind(&mut self, data: &QueryDict) {
                self.0.bind(data);
            }
            fn is_bound(&self) -> bool {
                self.0.is_bound()
            }
            async fn is_valid(&mut self) -> bool {
                let mut valid = self.0.is_valid().await;
                if let Err(errors) = self.clean().await {
                    self.0.errors.extend(errors);
                    valid = false;
                }
                valid
            }
            fn errors(&self) -> &HashMap<String, Vec<String>> {
                self.0.errors()
            }
            fn cleaned_data(&self) -> &HashMap<String, Value> {
                self.0.cleaned_data()
            }
            async fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
                if self.0.cleaned_data().get("username") == Some(&Value::from("admin")) {
                    let mut errors = HashMap::new();
                    errors.insert(
                        NON_FIELD_ERRORS.to_string(),
                        vec!["Reserved name.".to_string()],
                    );
                    return Err(errors);
                }
                Ok(())
            }
        }

        let mut form = NoAdmin(make_test_form());
        form.bind(&QueryDict::parse("username=admin&email=a@example.com"));
        assert!(!form.is_valid().await);
        assert_eq!(form.0.non_field_errors(), &["Reserved name.".to_string()]);
        assert!(form
            .0
            .as_p()
            .starts_with(r#"<ul class="errorlist nonfield"><li>Reserved name.</li></ul>"#));
    }

    #[tokio::test]
    async fn test_document_form_round_trip() {
        let mut form = BaseForm::new(fields_for_model(&POST));
        form.bind(&post_data(&[
            ("title", "Hello"),
            ("keywords", r#"["rust","forms"]"#),
            ("main_tag", r#"{"name":"lang","weight":"3"}"#),
            (
                "tags",
                r#"[{"name":"a","weight":""},{"name":"","weight":""}]"#,
            ),
        ]));
        assert!(form.is_valid().await, "{:?}", form.errors());

        let doc = form.cleaned_document().unwrap();
        assert_eq!(
            doc.keys().collect::<Vec<_>>(),
            vec!["title", "keywords", "main_tag", "tags"]
        );
        assert_eq!(
            doc.get("keywords"),
            Some(&Value::List(vec![Value::from("rust"), Value::from("forms")]))
        );
        let Some(Value::Document(main_tag)) = doc.get("main_tag") else {
            panic!("expected a document");
        };
        assert_eq!(main_tag.get("weight"), Some(&Value::Int(3)));
        let Some(Value::List(tags)) = doc.get("tags") else {
            panic!("expected a list");
        };
        assert_eq!(tags.len(), 1);
    }

    #[tokio::test]
    async fn test_document_form_errors() {
        let mut form = BaseForm::new(fields_for_model(&POST));
        form.bind(&post_data(&[
            ("title", "Hello"),
            ("main_tag", "{not json"),
            ("tags", r#"[{"name":"a","weight":"x"}]"#),
        ]));
        assert!(!form.is_valid().await);
        assert_eq!(form.errors()["main_tag"], vec!["Enter a valid value.".to_string()]);
        assert!(form.errors()["tags"][0].starts_with("Item 1: weight: "));
        assert!(!form.errors().contains_key("keywords"));
    }

    #[test]
    fn test_media_merges_document_widgets() {
        let form = BaseForm::new(fields_for_model(&POST));
        let media = form.media();
        assert_eq!(media.js().len(), 3);
        assert!(media.render_with("/static/").contains(
            r#"<script src="/static/mongoforms/js/list_embedded_model_field_widget.js"></script>"#
        ));
        assert!(make_test_form().media().is_empty());
    }

    #[test]
    fn test_unbound_form_renders_initial() {
        let mut tag = Document::new();
        tag.insert("name", "lang");
        tag.insert("weight", Value::Int(7));
        let mut initial = HashMap::new();
        initial.insert("title".to_string(), Value::from("Draft"));
        initial.insert("main_tag".to_string(), Value::Document(tag));
        let form = BaseForm::new(fields_for_model(&POST)).with_initial(initial);

        let html = form.as_p();
        assert!(html.contains(
            r#"<p><label for="id_title">Title</label> <input type="text" name="title" value="Draft" id="id_title" /></p>"#
        ));
        assert!(html.contains(r#"name="weight" value="7" id="main_tag_id_weight""#));
        assert!(html.contains(r#"<div id="div_list_field_keywords">"#));
    }

    #[tokio::test]
    async fn test_bound_form_renders_errors() {
        let mut form = BaseForm::new(fields_for_model(&POST));
        form.bind(&post_data(&[("title", ""), ("main_tag", "[oops")]));
        assert!(!form.is_valid().await);
        let html = form.as_p();
        assert!(html.contains(
            r#"<ul class="errorlist"><li>This field is required.</li></ul><p><label for="id_title">"#
        ));
        assert!(html.contains(r#"<input type="text" name="name" value="" id="main_tag_id_name" />"#));
    }
}
