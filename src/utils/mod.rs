//! Helpers shared across layers.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_normalizer`] - Target URL validation and canonicalization

pub mod code_generator;
pub mod url_normalizer;
