use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod repository;

// Routing segregated by access level (Public, Admin).
pub mod routes;
use routes::{admin, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::AppError;
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and response schema into the
/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_dashboard_stats, handlers::list_submissions, handlers::list_comments,
        handlers::list_categories, handlers::list_users, handlers::search_usernames,
        handlers::search_category_names, handlers::list_reported_submissions,
        handlers::list_reported_comments
    ),
    components(
        schemas(
            models::User, models::Category, models::Submission, models::Comment,
            models::Report, models::ReportableType, models::ReportTarget, models::ReportEntry,
            models::DashboardStats,
        )
    ),
    tags(
        (name = "voten-admin", description = "Administrator dashboard API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single immutable container shared by every request: the store handle and
/// the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    /// Read-only access to the content tables.
    pub repo: RepositoryState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Let extractors (notably `AuthUser`) pull single components out of AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing tree, attaches the administrator guard to the admin
/// router, and wraps everything in the request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let admin_router = admin::admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_administrator,
    ));

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .nest("/admin", admin_router)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Generate an id for every incoming request...
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // ...record it on the request span...
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // ...and echo it back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span so every log line of one request shares the
/// same `req_id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
