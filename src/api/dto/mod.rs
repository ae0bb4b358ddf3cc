//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization. Field names
//! follow the camelCase JSON contract of the browser front end.

pub mod health;
pub mod shorten;
pub mod stats;
