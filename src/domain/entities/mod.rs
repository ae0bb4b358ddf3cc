//! Core domain entities.
//!
//! - [`UrlRecord`] - A persisted short code mapping
//! - [`NewUrlRecord`] - Input for creating a mapping
//! - [`UrlSummary`] - Aggregates derived from all mappings

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord, UrlSummary};
