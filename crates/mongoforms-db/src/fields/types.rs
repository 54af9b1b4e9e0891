//! Field type definitions for document models.
//!
//! Each [`FieldType`] variant corresponds to a model field type of the
//! document mapping layer, and [`FieldDef`] captures all metadata about a
//! single model field. Besides the scalar types there are two container
//! types: [`FieldType::ListField`] and [`FieldType::EmbeddedModelField`].
//! A list whose item is an embedded model is a list of embedded documents.

use std::sync::Arc;

use crate::model::ModelMeta;
use crate::validators::Validator;
use crate::value::Value;

/// The type of a model field.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// Variable-length string with a max length.
    CharField,
    /// Unlimited-length text.
    TextField,
    /// 32-bit signed integer.
    IntegerField,
    /// 64-bit signed integer.
    BigIntegerField,
    /// 64-bit floating-point number.
    FloatField,
    /// Fixed-precision decimal number.
    DecimalField {
        /// Maximum total digits.
        max_digits: u32,
        /// Digits after the decimal point.
        decimal_places: u32,
    },
    /// Boolean (true/false).
    BooleanField,
    /// Date without time.
    DateField,
    /// Date and time.
    DateTimeField,
    /// Time without date.
    TimeField,
    /// UUID field.
    UuidField,
    /// Email address (CharField with email validation).
    EmailField,
    /// URL (CharField with URL validation).
    UrlField,
    /// Slug (URL-friendly string).
    SlugField,
    /// Arbitrary JSON data.
    JsonField,
    /// Document identifier assigned by the database.
    ObjectIdField,
    /// A list of values of a single item type.
    ListField {
        /// The type of each list item.
        item: Box<FieldType>,
    },
    /// A single sub-document described by another model.
    EmbeddedModelField {
        /// The embedded model's metadata.
        model: &'static ModelMeta,
    },
}

impl FieldType {
    /// Shorthand for a `ListField` of the given item type.
    pub fn list(item: Self) -> Self {
        Self::ListField {
            item: Box::new(item),
        }
    }

    /// Shorthand for an `EmbeddedModelField` of the given model.
    pub const fn embedded(model: &'static ModelMeta) -> Self {
        Self::EmbeddedModelField { model }
    }

    /// Shorthand for a list of embedded documents of the given model.
    pub fn list_of_embedded(model: &'static ModelMeta) -> Self {
        Self::list(Self::embedded(model))
    }
}

/// Which form field a scalar list field is edited with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFormStyle {
    /// One input per item, serialized to a JSON array on submit.
    #[default]
    Json,
    /// A single text input holding comma-separated items.
    CommaSeparated,
}

/// Complete definition of a model field, including metadata and constraints.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// The attribute name of this field.
    pub name: &'static str,
    /// The type of this field.
    pub field_type: FieldType,
    /// Whether this field is the primary key.
    pub primary_key: bool,
    /// Whether a missing value is allowed in storage.
    pub null: bool,
    /// Whether the field may be left blank in forms.
    pub blank: bool,
    /// Default value for new instances.
    pub default: Option<Value>,
    /// Maximum character length (for CharField and similar).
    pub max_length: Option<usize>,
    /// Human-readable help text.
    pub help_text: String,
    /// Human-readable name for the field.
    pub verbose_name: String,
    /// Allowed values as (value, display_label) pairs.
    pub choices: Option<Vec<(Value, String)>>,
    /// Validators carried over to the generated form field.
    pub validators: Vec<Arc<dyn Validator>>,
    /// Whether the field is editable in forms.
    pub editable: bool,
    /// Form flavour for scalar list fields.
    pub list_style: ListFormStyle,
}

impl FieldDef {
    /// Creates a new `FieldDef` with sensible defaults.
    ///
    /// Only the field name and type are required. All other attributes take
    /// their default values (required, editable, JSON list form).
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            primary_key: false,
            null: false,
            blank: false,
            default: None,
            max_length: None,
            help_text: String::new(),
            verbose_name: name.replace('_', " "),
            choices: None,
            validators: Vec::new(),
            editable: true,
            list_style: ListFormStyle::Json,
        }
    }

    /// Marks this field as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Allows missing values.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    /// Allows the field to be left blank in forms.
    #[must_use]
    pub const fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    /// Sets the maximum character length.
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets the default value for this field.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the verbose (human-readable) name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = name.into();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Restricts the field to a fixed set of choices.
    #[must_use]
    pub fn choices(mut self, choices: Vec<(Value, String)>) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Adds a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Excludes the field from generated forms.
    #[must_use]
    pub const fn not_editable(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Edits a scalar list field with a comma-separated text input.
    #[must_use]
    pub const fn simple_list_form(mut self) -> Self {
        self.list_style = ListFormStyle::CommaSeparated;
        self
    }

    /// Returns `true` if a generated form field for this model field must be
    /// filled in.
    pub const fn is_required(&self) -> bool {
        !self.null && !self.blank && self.default.is_none()
    }
}
