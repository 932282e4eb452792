use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, sync::Arc};

use crate::config::AppConfig;

/// Cookie carrying the session JWT when no Authorization header is sent.
pub const SESSION_COOKIE: &str = "session_token";

/// Development header that stands in for a signed session. Honored only when
/// `AppConfig::allow_dev_session_header` is set.
pub const LOCAL_SESSION_HEADER: &str = "x-session-email";

/// Claims
///
/// Payload of a session JWT issued by the auth provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the admin user's identifier at the auth provider.
    pub sub: String,
    /// Display email. Providers may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

/// Session
///
/// Authenticated admin state. This service only checks that one exists and reads
/// `email` for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub subject: String,
    pub email: Option<String>,
}

/// SessionProvider
///
/// Resolves the session attached to a request. Implementations never fail: anything
/// short of a valid session is reported as `None`.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_session(&self, parts: &Parts) -> Option<Session>;
}

/// SessionState
///
/// Shared handle to the configured session provider held in `AppState`.
pub type SessionState = Arc<dyn SessionProvider>;

/// JwtSessionProvider
///
/// Verifies HS256 session tokens taken from `Authorization: Bearer <jwt>` or, failing
/// that, from the `session_token` cookie.
///
/// When built with `dev_header` enabled, the `x-session-email` header is also accepted as
/// a development bypass.
pub struct JwtSessionProvider {
    decoding_key: DecodingKey,
    dev_header: bool,
}

impl JwtSessionProvider {
    pub fn new(secret: &str, dev_header: bool) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            dev_header,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.session_secret, config.allow_dev_session_header)
    }

    /// Decodes and validates a token. Expiry is always enforced.
    pub fn verify(&self, token: &str) -> Option<Session> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(Session {
                subject: data.claims.sub,
                email: data.claims.email,
            }),
            Err(e) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("session token expired"),
                    _ => tracing::debug!("session token rejected: {}", e),
                }
                None
            }
        }
    }
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn current_session(&self, parts: &Parts) -> Option<Session> {
        if self.dev_header {
            if let Some(email) = parts
                .headers
                .get(LOCAL_SESSION_HEADER)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
            {
                return Some(Session {
                    subject: "local-dev".to_string(),
                    email: Some(email.to_string()),
                });
            }
        }

        let token = session_token(&parts.headers)?;
        self.verify(&token)
    }
}

/// Pulls the raw token from the Authorization header, then from the session cookie.
fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        return Some(token.trim().to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// CurrentSession
///
/// Extractor that asks the configured `SessionProvider` for the request's session.
/// It never rejects: a missing session is a normal branch that handlers decide on.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Session>);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    SessionState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionState::from_ref(state);
        Ok(CurrentSession(sessions.current_session(parts).await))
    }
}

/// AdminGate
///
/// Outcome of the admin admission check, decided fresh on every request.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminGate {
    /// No session: the caller must be sent to the login page.
    Unauthenticated,
    /// Session present: render the admin shell with the session's display email.
    Authenticated { user_email: Option<String> },
}

/// admin_gate
///
/// The authoritative admission decision for the admin section. The edge filters in
/// front of it never block, so this check is what actually guards admin pages.
pub fn admin_gate(session: Option<Session>) -> AdminGate {
    match session {
        None => AdminGate::Unauthenticated,
        Some(session) => AdminGate::Authenticated {
            user_email: session.email,
        },
    }
}
