#![allow(dead_code)]

use axum::Router;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use shortlink::domain::repositories::UrlRepository;
use shortlink::infrastructure::persistence::MemoryUrlRepository;
use shortlink::routes::{RouterOptions, app_router};
use shortlink::state::AppState;
use shortlink::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::Layer;

pub const BASE_URL: &str = "http://sho.rt";

pub fn create_test_state() -> (AppState, Arc<MemoryUrlRepository>) {
    create_test_state_with(Arc::new(RandomCodeGenerator::default()), None)
}

pub fn create_test_state_with_token(token: &str) -> (AppState, Arc<MemoryUrlRepository>) {
    create_test_state_with(
        Arc::new(RandomCodeGenerator::default()),
        Some(token.to_string()),
    )
}

pub fn create_test_state_with(
    generator: Arc<dyn CodeGenerator>,
    admin_token: Option<String>,
) -> (AppState, Arc<MemoryUrlRepository>) {
    let repository = Arc::new(MemoryUrlRepository::new());
    let state = AppState::new(
        repository.clone() as Arc<dyn UrlRepository>,
        generator,
        BASE_URL,
        10,
        admin_token,
    );

    (state, repository)
}

/// Full application router (no rate limiting) wrapped for `TestServer`.
pub fn test_server(state: AppState) -> TestServer {
    test_server_with(state, &RouterOptions::default())
}

pub fn test_server_with(state: AppState, options: &RouterOptions) -> TestServer {
    let app: Router = Router::new()
        .fallback_service(app_router(state, options))
        .layer(MockConnectInfoLayer);

    TestServer::new(app).unwrap()
}

/// Always proposes the same code, forcing collisions after the first insert.
pub struct FixedCodeGenerator {
    code: &'static str,
    calls: AtomicUsize,
}

impl FixedCodeGenerator {
    pub fn new(code: &'static str) -> Self {
        Self {
            code,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.code.to_string()
    }
}

/// Inserts a fixed peer address, as `into_make_service_with_connect_info` does.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
