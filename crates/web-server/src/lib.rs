use analytics::AnalyticsEngine;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
};
use configuration::{Analysis, Config};
use registry::{DatasetRepository, InMemoryRepository, RegistryError};
use std::collections::HashSet;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod auth;
pub mod error;
pub mod export;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub repo: Arc<dyn DatasetRepository>,
    pub engine: AnalyticsEngine,
    pub analysis: Analysis,
    /// Accepted bearer tokens. Empty means authentication is disabled.
    pub tokens: HashSet<String>,
}

impl AppState {
    pub fn new(repo: Arc<dyn DatasetRepository>, config: &Config) -> Self {
        Self {
            repo,
            engine: AnalyticsEngine::new(),
            analysis: config.analysis.clone(),
            tokens: config.auth.tokens.iter().cloned().collect(),
        }
    }
}

/// Builds a repository holding the configured synthetic datasets, or an
/// empty one if seeding is disabled.
pub fn seeded_repository(config: &Config) -> Result<InMemoryRepository, RegistryError> {
    if !config.seed.enabled {
        return Ok(InMemoryRepository::new());
    }
    let datasets =
        registry::synthetic::seed_datasets(config.seed.start_date, config.seed.days, config.seed.seed)?;
    tracing::info!(
        count = datasets.len(),
        days = config.seed.days,
        seed = config.seed.seed,
        "Seeded synthetic datasets."
    );
    Ok(InMemoryRepository::with_datasets(datasets))
}

/// Defines every route and middleware of the API.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    let datasets = Router::new()
        .route(
            "/datasets",
            get(handlers::list_datasets).post(handlers::create_dataset),
        )
        .route("/datasets/:id", get(handlers::get_dataset))
        .route("/datasets/:id/summary", get(handlers::get_summary))
        .route("/datasets/:id/trend", get(handlers::get_trend))
        .route("/datasets/:id/correlation", get(handlers::get_correlation))
        .route("/datasets/:id/export", get(handlers::export_csv))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", datasets)
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024 * 10)) // Set a 10MB body limit
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(config: Config, repo: Arc<dyn DatasetRepository>) -> anyhow::Result<()> {
    let addr = config.server.addr();
    if config.auth.tokens.is_empty() {
        tracing::warn!("No auth tokens configured; the API is open to every caller.");
    }

    let state = Arc::new(AppState::new(repo, &config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
}
