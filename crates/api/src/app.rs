use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{circles, health, invitations, members, tasks};
use crate::services::ledger::LedgerGateway;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    /// Fallback read path for cache misses; `None` runs the cache alone.
    pub ledger: Option<Arc<dyn LedgerGateway>>,
}

pub fn create_app(
    config: Config,
    pool: SqlitePool,
    ledger: Option<Arc<dyn LedgerGateway>>,
) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        ledger,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Cache reconciliation routes
    let api_routes = Router::new()
        .route("/circles/upsert", post(circles::upsert_circle))
        .route("/circles/:id", get(circles::get_circle))
        .route("/circles/:id/stats", get(circles::get_circle_stats))
        .route("/circles/:id/members", get(members::get_circle_members))
        .route("/circles/:id/tasks", get(tasks::get_circle_tasks))
        .route(
            "/circles/:id/invitations",
            get(invitations::list_invitations),
        )
        .route("/members/upsert", post(members::upsert_member))
        .route("/tasks/upsert", post(tasks::upsert_task))
        .route("/invitations/send", post(invitations::send_invitation))
        .route(
            "/invitations/:token/accept",
            post(invitations::accept_invitation),
        );

    // Probes and metrics (no business logic)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
