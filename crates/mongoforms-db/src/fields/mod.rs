//! Field definitions and types for document models.
//!
//! This module provides the [`FieldDef`] struct and [`FieldType`] enum that
//! describe model fields, including list fields and embedded-model fields.

pub mod types;

pub use types::{FieldDef, FieldType, ListFormStyle};
