use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /api/conversions
        // Conversion intake. Validates the two identifiers and hands the event to the sink.
        .route("/api/conversions", post(handlers::create_conversion))
        // GET /api/landers/{id}
        // Lander lookup by opaque id.
        .route("/api/landers/{id}", get(handlers::get_lander))
}
