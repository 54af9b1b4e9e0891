//! # mongoforms-core
//!
//! Core types, settings, and error types shared by the mongoforms crates.
//! This crate has no dependency on the document or form layers.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`utils`] - `QueryDict` form data, HTML helpers
//! - [`settings`] - Widget and logging configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{FormsError, FormsResult, ValidationError};
pub use settings::{Settings, SETTINGS};
pub use utils::QueryDict;
