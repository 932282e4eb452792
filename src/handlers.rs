use crate::{
    AppState,
    auth::{AdminGate, CurrentSession, admin_gate},
    bot::is_bot_request,
    error::{ApiError, ErrorBody},
    models::{ConversionAccepted, ConversionEvent, ConversionRequest, LanderResponse, SessionInfo},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::Value;

// --- Public API ---

/// create_conversion
///
/// [Public Route] Accepts a conversion event.
///
/// Requires non-empty `campaignId` and `clickSessionId` strings. On success the typed
/// event goes to the configured `IntakeSink` and the original body is echoed back with
/// `status: "queued"`. Other fields are passed through without validation.
#[utoipa::path(
    post,
    path = "/api/conversions",
    request_body = ConversionRequest,
    responses(
        (status = 201, description = "Queued", body = ConversionAccepted),
        (status = 400, description = "Missing identifiers or invalid JSON", body = ErrorBody),
        (status = 503, description = "Sink unavailable", body = ErrorBody)
    )
)]
pub async fn create_conversion(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ConversionAccepted>), ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!("conversion body rejected: {}", rejection);
        ApiError::InvalidBody
    })?;

    let event = ConversionEvent::from_body(&body, is_bot_request(&headers))?;
    tracing::info!(
        conversion_id = %event.id,
        campaign_id = %event.campaign_id,
        bot_traffic = event.bot_traffic,
        "conversion accepted"
    );

    state.intake.submit(event).await?;

    Ok((StatusCode::CREATED, Json(ConversionAccepted::queued(body))))
}

/// get_lander
///
/// [Public Route] Fetches one lander by its id. The id is taken from the path as-is.
#[utoipa::path(
    get,
    path = "/api/landers/{id}",
    params(("id" = String, Path, description = "Lander ID")),
    responses(
        (status = 200, description = "Found", body = LanderResponse),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_lander(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LanderResponse>, ApiError> {
    match state.repo.get_lander_by_id(&id).await {
        Some(lander) => Ok(Json(LanderResponse { lander })),
        None => Err(ApiError::NotFound),
    }
}

// --- Admin ---

/// admin_shell
///
/// [Admin Page] Renders the admin shell for `/admin` and everything below it.
/// Without a session the visitor is redirected to the login page and nothing else is sent.
pub async fn admin_shell(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
) -> Response {
    match admin_gate(session) {
        AdminGate::Unauthenticated => {
            Redirect::temporary(&state.config.login_path).into_response()
        }
        AdminGate::Authenticated { user_email } => {
            Html(render_admin_shell(user_email.as_deref())).into_response()
        }
    }
}

/// get_admin_session
///
/// [Admin API] Reports the display email of the current admin session.
#[utoipa::path(
    get,
    path = "/api/admin/session",
    responses(
        (status = 200, description = "Session", body = SessionInfo),
        (status = 401, description = "No session", body = ErrorBody)
    )
)]
pub async fn get_admin_session(
    CurrentSession(session): CurrentSession,
) -> Result<Json<SessionInfo>, ApiError> {
    match admin_gate(session) {
        AdminGate::Authenticated { user_email } => Ok(Json(SessionInfo { email: user_email })),
        AdminGate::Unauthenticated => Err(ApiError::Unauthorized),
    }
}

/// Minimal admin page frame. The client-side dashboard mounts into `#admin-root`.
pub fn render_admin_shell(user_email: Option<&str>) -> String {
    let who = user_email
        .map(escape_html)
        .unwrap_or_else(|| "Signed in".to_string());
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Admin</title></head>\n\
         <body>\n<header class=\"admin-header\"><span class=\"admin-user\">{who}</span></header>\n\
         <main id=\"admin-root\"></main>\n</body>\n</html>\n"
    )
}

// The email comes from a token claim (or the dev header), so it is untrusted input.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
