//! Integration tests for the model -> form -> POST -> cleaned document
//! pipeline with list and embedded-document fields.

use std::collections::HashMap;
use std::sync::LazyLock;

use mongoforms_core::QueryDict;
use mongoforms_db::validators::MaxLengthValidator;
use mongoforms_db::{Document, DocumentModel, FieldDef, FieldType, ModelMeta, Value};
use mongoforms_forms::form::{BaseForm, Form};
use mongoforms_forms::model_form::{
    fields_for_model, generate_form_fields, initial_from_instance, ModelFormConfig,
    ModelFormFields,
};
use mongoforms_forms::validation::full_clean;
use mongoforms_forms::FormFieldType;

// ============================================================================
// Models
// ============================================================================

static ADDRESS_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    app_label: "people",
    model_name: "address",
    verbose_name: "address".to_string(),
    fields: vec![
        FieldDef::new("street", FieldType::CharField)
            .max_length(40)
            .validator(MaxLengthValidator::new(40)),
        FieldDef::new("city", FieldType::CharField),
        FieldDef::new("zip", FieldType::CharField).blank(),
    ],
});

static PHONE_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    app_label: "people",
    model_name: "phone",
    verbose_name: "phone".to_string(),
    fields: vec![
        FieldDef::new("kind", FieldType::CharField).choices(vec![
            (Value::from("home"), "Home".to_string()),
            (Value::from("work"), "Work".to_string()),
        ]),
        FieldDef::new("number", FieldType::CharField).verbose_name("phone number"),
    ],
});

static PERSON_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    app_label: "people",
    model_name: "person",
    verbose_name: "person".to_string(),
    fields: vec![
        FieldDef::new("id", FieldType::ObjectIdField).primary_key(),
        FieldDef::new("name", FieldType::CharField).verbose_name("Name"),
        FieldDef::new("emails", FieldType::list(FieldType::EmailField)),
        FieldDef::new("nicknames", FieldType::list(FieldType::CharField))
            .simple_list_form()
            .blank(),
        FieldDef::new("address", FieldType::embedded(&ADDRESS_META)),
        FieldDef::new("phones", FieldType::list_of_embedded(&PHONE_META)).blank(),
    ],
});

struct Person {
    name: String,
    emails: Vec<String>,
    address: Document,
    phones: Vec<Document>,
}

impl DocumentModel for Person {
    fn meta() -> &'static ModelMeta {
        &PERSON_META
    }

    fn field_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from("650c1f1e")),
            ("name", Value::from(self.name.as_str())),
            (
                "emails",
                Value::List(self.emails.iter().map(|e| Value::from(e.as_str())).collect()),
            ),
            ("nicknames", Value::List(vec![])),
            ("address", Value::Document(self.address.clone())),
            (
                "phones",
                Value::List(self.phones.iter().cloned().map(Value::Document).collect()),
            ),
        ]
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn doc(pairs: &[(&str, &str)]) -> Document {
    pairs
        .iter()
        .map(|(k, v)| (*k, Value::from(*v)))
        .collect()
}

fn ada() -> Person {
    Person {
        name: "Ada".to_string(),
        emails: vec!["ada@example.com".to_string()],
        address: doc(&[("street", "12 St James's Sq"), ("city", "London"), ("zip", "SW1Y")]),
        phones: vec![doc(&[("kind", "home"), ("number", "555-0100")])],
    }
}

/// Builds a POST body the way a browser would send it, then parses it back.
fn post(pairs: &[(&str, &str)]) -> QueryDict {
    let mut qd = QueryDict::new_mutable();
    for (key, value) in pairs {
        qd.append(key, value).unwrap();
    }
    QueryDict::parse(&qd.urlencode())
}

fn person_form() -> BaseForm {
    BaseForm::new(fields_for_model(&PERSON_META))
}

// ============================================================================
// Model form generation
// ============================================================================

#[test]
fn test_person_form_fields() {
    let fields = fields_for_model(&PERSON_META);
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["name", "emails", "nicknames", "address", "phones"]);

    let FormFieldType::ListEmbedded(phones) = &fields[4].field_type else {
        panic!("phones should be a list of embedded documents");
    };
    let kind = &phones.embedded_field().embedded_fields()[0];
    assert!(matches!(kind.field_type, FormFieldType::Choice { .. }));
}

#[test]
fn test_generate_form_fields_include() {
    let config = ModelFormConfig::new(&PERSON_META)
        .with_fields(ModelFormFields::Include(vec!["address".into()]))
        .with_label("address", "Home address");
    let fields = generate_form_fields(&config);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].label, "Home address");
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_edit_form_renders_instance() {
    let form = person_form().with_initial(initial_from_instance(&ada()));
    let html = form.as_p();

    assert!(html.contains(r#"name="list_field_emails" value="ada@example.com""#));
    assert!(html.contains(r#"name="street" value="12 St James&#x27;s Sq" id="address_id_street""#));
    assert!(html.contains(r#"<option value="home" selected>Home</option>"#));
    assert!(html.contains(r#"name="number" value="555-0100""#));
    assert!(html.contains(r#"<input type="text" name="nicknames" value="" id="id_nicknames" />"#));
}

#[test]
fn test_create_form_renders_blank_rows() {
    let html = person_form().as_p();
    assert_eq!(html.matches(r#"name="list_field_emails" value="""#).count(), 1);
    assert_eq!(html.matches("<tbody> <tr>").count(), 1);
    assert!(html.contains(r#"<th> phone number </th>"#));
}

#[test]
fn test_form_media() {
    let media = person_form().media();
    assert_eq!(
        media.css(),
        &[
            "mongoforms/css/list_field_widget.css".to_string(),
            "mongoforms/css/embedded_model_field_widget.css".to_string(),
            "mongoforms/css/list_embedded_model_field_widget.css".to_string(),
        ]
    );
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_submit_creates_document() {
    let mut form = person_form();
    form.bind(&post(&[
        ("name", "Grace"),
        ("emails", r#"["grace@example.com","hopper@example.com"]"#),
        ("nicknames", "amazing grace, , admiral"),
        ("address", r#"{"street":"1 Navy Rd","city":"Arlington","zip":""}"#),
        (
            "phones",
            r#"[{"kind":"work","number":"555-0199"},{"kind":"","number":""}]"#,
        ),
    ]));
    assert!(form.is_valid().await, "{:?}", form.errors());

    let document = form.cleaned_document().unwrap();
    let mut expected = Document::new();
    expected.insert("name", "Grace");
    expected.insert(
        "emails",
        Value::List(vec![
            Value::from("grace@example.com"),
            Value::from("hopper@example.com"),
        ]),
    );
    expected.insert(
        "nicknames",
        Value::List(vec![Value::from("amazing grace"), Value::from("admiral")]),
    );
    let mut address = doc(&[("street", "1 Navy Rd"), ("city", "Arlington")]);
    address.insert("zip", Value::Null);
    expected.insert("address", Value::Document(address));
    expected.insert(
        "phones",
        Value::List(vec![Value::Document(doc(&[
            ("kind", "work"),
            ("number", "555-0199"),
        ]))]),
    );
    assert_eq!(document, expected);
}

#[tokio::test]
async fn test_resubmitting_rendered_instance_round_trips() {
    let person = ada();
    let original = person.to_document();

    let mut form = person_form();
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (name, value) in initial_from_instance(&person) {
        let raw = match &value {
            Value::List(items) if name == "nicknames" => items
                .iter()
                .filter_map(Value::to_input_string)
                .collect::<Vec<_>>()
                .join(", "),
            Value::List(_) | Value::Document(_) => value.to_json().to_string(),
            other => other.to_input_string().unwrap_or_default(),
        };
        pairs.push((name, raw));
    }
    let pairs: Vec<(&str, &str)> = pairs
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    form.bind(&post(&pairs));
    assert!(form.is_valid().await, "{:?}", form.errors());

    let cleaned = form.cleaned_document().unwrap();
    for key in ["name", "emails", "address", "phones"] {
        assert_eq!(cleaned.get(key), original.get(key), "{key}");
    }
}

#[tokio::test]
async fn test_submit_reports_nested_errors() {
    let mut form = person_form();
    form.bind(&post(&[
        ("name", "Grace"),
        ("emails", "[]"),
        ("address", r#"{"street":"","city":"Arlington"}"#),
        ("phones", r#"[{"kind":"fax","number":"1"}]"#),
    ]));

    let errors: HashMap<String, Vec<String>> =
        full_clean(&mut form).await.unwrap_err().into_iter().collect();
    assert_eq!(errors["emails"], vec!["This field is required.".to_string()]);
    assert_eq!(
        errors["address"],
        vec!["street: This field is required.".to_string()]
    );
    assert!(errors["phones"][0].starts_with("Item 1: kind: "));
    assert!(!errors.contains_key("name"));
}

#[tokio::test]
async fn test_sub_field_validators_run() {
    let long_street = "x".repeat(41);
    let address = format!(r#"{{"street":"{long_street}","city":"Rome"}}"#);
    let mut form = person_form();
    form.bind(&post(&[
        ("name", "Grace"),
        ("emails", r#"["g@example.com"]"#),
        ("address", &address),
    ]));
    assert!(!form.is_valid().await);
    assert!(form.errors()["address"][0].starts_with("street: "));
}

#[tokio::test]
async fn test_malformed_wire_value_rerenders_blank() {
    let mut form = person_form();
    form.bind(&post(&[
        ("name", "Grace"),
        ("emails", "not json"),
        ("address", r#"{"street":"a","city":"b"}"#),
    ]));
    assert!(!form.is_valid().await);
    assert_eq!(form.errors()["emails"], vec!["Enter a valid value.".to_string()]);

    let html = form.as_p();
    assert!(html.contains(r#"<ul class="errorlist"><li>Enter a valid value.</li></ul>"#));
    assert_eq!(html.matches(r#"name="list_field_emails" value="""#).count(), 1);
    assert!(html.contains(r#"name="street" value="a" id="address_id_street""#));
}
