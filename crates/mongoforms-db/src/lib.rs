//! # mongoforms-db
//!
//! The document-mapping side of mongoforms: the [`Value`](value::Value) and
//! [`Document`](document::Document) types that model instances are made of,
//! model field definitions (including list and embedded-model fields), model
//! metadata, and field validators.
//!
//! ## Modules
//!
//! - [`value`] - Backend-agnostic document values and JSON conversion
//! - [`document`] - Insertion-ordered sub-document map
//! - [`fields`] - `FieldDef` and `FieldType`
//! - [`model`] - `ModelMeta` and the `DocumentModel` trait
//! - [`validators`] - Reusable field validators

pub mod document;
pub mod fields;
pub mod model;
pub mod validators;
pub mod value;

pub use document::Document;
pub use fields::{FieldDef, FieldType, ListFormStyle};
pub use model::{DocumentModel, ModelMeta};
pub use value::Value;
