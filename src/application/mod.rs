//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Shortening and deletion
//! - [`services::redirect_service::RedirectService`] - Code resolution with click counting
//! - [`services::stats_service::StatsService`] - Read-only listing and aggregates

pub mod services;
