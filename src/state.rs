//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, RedirectService, StatsService};
use crate::domain::repositories::UrlRepository;
use crate::utils::code_generator::CodeGenerator;

pub type AppLinkService = LinkService<dyn UrlRepository, dyn CodeGenerator>;
pub type AppRedirectService = RedirectService<dyn UrlRepository>;
pub type AppStatsService = StatsService<dyn UrlRepository>;

/// Services wired over one mapping store.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<AppLinkService>,
    pub redirect_service: Arc<AppRedirectService>,
    pub stats_service: Arc<AppStatsService>,
    pub repository: Arc<dyn UrlRepository>,
    /// When set, destructive admin endpoints require this bearer token.
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    /// Wires all services over `repository`.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        generator: Arc<dyn CodeGenerator>,
        base_url: &str,
        max_attempts: u32,
        admin_token: Option<String>,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(
                repository.clone(),
                generator,
                base_url,
                max_attempts,
            )),
            redirect_service: Arc::new(RedirectService::new(repository.clone())),
            stats_service: Arc::new(StatsService::new(repository.clone())),
            repository,
            admin_token: admin_token.map(Arc::from),
        }
    }
}
