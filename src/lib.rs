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
pub mod bot;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod repository;

pub mod routes;
use routes::{admin, public};

// --- Public Re-exports ---

pub use auth::{JwtSessionProvider, SessionState};
pub use bot::is_bot_traffic;
pub use config::AppConfig;
pub use intake::{DisabledIntakeSink, IntakeState, MemoryIntakeSink, PostgresIntakeSink};
pub use repository::{InMemoryLanderRepository, PostgresLanderRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document for the JSON endpoints, served at `/api-docs/openapi.json`.
/// The admin shell is an HTML page and is left out.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_conversion, handlers::get_lander, handlers::get_admin_session
    ),
    components(
        schemas(
            models::Lander, models::LanderResponse, models::ConversionRequest,
            models::ConversionAccepted, models::ConversionEvent, models::SessionInfo,
            error::ErrorBody,
        )
    ),
    tags(
        (name = "lander-gate", description = "Lander lookup and conversion intake API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Immutable container for the services every request may need. Cloning it only
/// clones `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Lander lookups.
    pub repo: RepositoryState,
    /// Destination for accepted conversions.
    pub intake: IntakeState,
    /// Session resolution for the admin gate.
    pub sessions: SessionState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for IntakeState {
    fn from_ref(app_state: &AppState) -> IntakeState {
        app_state.intake.clone()
    }
}

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routers, the edge filters and the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        // Admin routes carry their own pass-through filter; the gate lives in the handlers.
        .merge(admin::admin_routes())
        .with_state(state)
        // General edge filter. Runs for every request, including unmatched paths.
        .layer(middleware::from_fn(filter::edge_filter));

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span so every log line carries the `x-request-id`.
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
