pub mod api;
pub mod config;
pub mod handlers;
pub mod infrastructure;
pub mod middleware;
pub mod services;

use crate::config::AppConfig;
use crate::services::local_store::LocalStore;
use crate::services::publisher::BlobPublisher;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::html::generate_html,
        handlers::images::upload_image,
        handlers::health::health_check,
    ),
    components(
        schemas(
            handlers::html::HtmlRequest,
            handlers::html::HtmlResponse,
            handlers::images::ImageRequest,
            handlers::images::ImageResponse,
            handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "publish", description = "Content publication endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub html_store: Arc<LocalStore>,
    pub image_store: Arc<LocalStore>,
    pub publisher: Arc<dyn BlobPublisher>,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig, publisher: Arc<dyn BlobPublisher>) -> Self {
        let html_store = Arc::new(LocalStore::new(&config.html_dir));
        let image_store = Arc::new(LocalStore::new(&config.image_dir));
        let http_client = services::fetcher::build_client(config.fetch_timeout_secs);

        Self {
            config: Arc::new(config),
            html_store,
            image_store,
            publisher,
            http_client,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    // Read-only static mounts over the two local directories.
    let html_files = ServeDir::new(state.html_store.directory());
    let image_files = ServeDir::new(state.image_store.directory());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route(
            "/generate-html/",
            post(handlers::html::generate_html)
                .layer(from_fn_with_state(state.clone(), middleware::auth::auth_middleware)),
        )
        .route(
            "/upload-image/",
            post(handlers::images::upload_image)
                .layer(from_fn_with_state(state.clone(), middleware::auth::auth_middleware)),
        )
        .route("/health", get(handlers::health::health_check))
        .nest_service("/html_output", html_files)
        .nest_service("/images", image_files)
        .with_state(state)
}
