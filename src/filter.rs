//! Edge request filters.
//!
//! Both filters are pass-through: they have a single "allow" outcome and never
//! modify the request or the response.
//!
//! Disabled feature: click-id capture. The general filter used to copy ad-click
//! identifiers (`gclid`, `gbraid`, `wbraid`, `fbclid`, `msclkid`) from the query string
//! into cookies and enrich requests with tracking parameters. That behavior was removed
//! for policy compliance. Reintroducing parameter harvesting, cookie writes from click
//! identifiers, hidden redirects or hidden iframes here requires a compliance review.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::bot::is_bot_request;

/// Path prefix reserved for framework internals (static chunks, image optimizer, data
/// routes, HMR). The general filter skips everything under it.
const RESERVED_PREFIX: &str = "/_next";
const FAVICON: &str = "/favicon.ico";

/// Path roots covered by the admin-scoped filter.
const ADMIN_ROOTS: [&str; 2] = ["/admin", "/api/admin"];

/// general_filter_applies
///
/// True for every path except framework-reserved paths and the favicon. Both exclusions
/// are plain prefix matches on the path, so `/_nextgen` is skipped as well.
pub fn general_filter_applies(path: &str) -> bool {
    !(path.starts_with(RESERVED_PREFIX) || path.starts_with(FAVICON))
}

/// admin_filter_applies
///
/// True for admin pages (`/admin`, `/admin/...`) and admin API paths
/// (`/api/admin`, `/api/admin/...`). `/administrator` is not an admin path.
pub fn admin_filter_applies(path: &str) -> bool {
    ADMIN_ROOTS.iter().any(|root| matches_root(path, root))
}

/// Segment-aware prefix match: `root` itself or anything below `root/`.
fn matches_root(path: &str, root: &str) -> bool {
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// edge_filter
///
/// The general filter, layered over the whole router. For covered paths it records the
/// bot classification at debug level and then hands the request on untouched.
pub async fn edge_filter(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if general_filter_applies(path) {
        tracing::debug!(
            path = %path,
            bot_traffic = is_bot_request(request.headers()),
            "edge filter: allow"
        );
    }
    next.run(request).await
}

/// admin_filter
///
/// The admin-scoped filter, layered over the admin routers. It always allows; admission
/// is decided by the admin gate in the handlers.
pub async fn admin_filter(request: Request, next: Next) -> Response {
    if admin_filter_applies(request.uri().path()) {
        tracing::trace!(path = %request.uri().path(), "admin filter: allow");
    }
    next.run(request).await
}
