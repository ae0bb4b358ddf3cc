//! Infrastructure layer for external integrations.
//!
//! Implements the repository traits defined by the domain layer.
//!
//! - [`persistence`] - PostgreSQL and in-memory mapping stores

pub mod persistence;
