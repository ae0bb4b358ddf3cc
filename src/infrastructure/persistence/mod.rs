//! Mapping store implementations.
//!
//! - [`PgUrlRepository`] - Durable PostgreSQL store (production)
//! - [`MemoryUrlRepository`] - Sharded in-process store (development, tests)

pub mod memory_url_repository;
pub mod pg_url_repository;

pub use memory_url_repository::MemoryUrlRepository;
pub use pg_url_repository::PgUrlRepository;
