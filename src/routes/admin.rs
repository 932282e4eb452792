use crate::{AppState, filter, handlers};
use axum::{Router, middleware, routing::get};

/// Admin Router Module
///
/// Admin pages and the admin API. The `admin_filter` route layer always allows;
/// every handler here runs the admin gate itself.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin, /admin/{*path}
        // Admin shell. Redirects to the login page when there is no session.
        .route("/admin", get(handlers::admin_shell))
        .route("/admin/{*path}", get(handlers::admin_shell))
        // GET /api/admin/session
        // Display data for the signed-in admin; 401 without a session.
        .route("/api/admin/session", get(handlers::get_admin_session))
        .route_layer(middleware::from_fn(filter::admin_filter))
}
