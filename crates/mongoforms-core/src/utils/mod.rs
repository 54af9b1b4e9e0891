//! Utility types and functions.
//!
//! - [`QueryDict`]: Submitted form data parsed from a urlencoded body.
//! - [`html`]: Escaping and attribute rendering for widget markup.

pub mod html;
mod querydict;

pub use querydict::QueryDict;
