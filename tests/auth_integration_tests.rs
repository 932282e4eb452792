use axum::{
    extract::FromRequestParts,
    http::{Request, header, request::Parts},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use lander_gate::{
    AppState, InMemoryLanderRepository, MemoryIntakeSink,
    auth::{
        AdminGate, Claims, CurrentSession, JwtSessionProvider, LOCAL_SESSION_HEADER,
        SESSION_COOKIE, Session, SessionProvider, admin_gate,
    },
    config::AppConfig,
};
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

const SECRET: &str = "super-secure-test-secret-value-local";

// --- Test Utilities ---

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

fn mint_token(secret: &str, email: Option<&str>, exp: usize) -> String {
    let claims = Claims {
        sub: "admin-1".to_string(),
        email: email.map(str::to_string),
        exp,
        iat: now(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn parts_with(headers: &[(&str, String)]) -> Parts {
    let mut builder = Request::builder().uri("/admin");
    for (name, value) in headers {
        builder = builder.header(*name, value.as_str());
    }
    let (parts, _) = builder.body(()).unwrap().into_parts();
    parts
}

// --- Tests ---

#[tokio::test]
async fn test_bearer_token_yields_session() {
    let provider = JwtSessionProvider::new(SECRET, false);
    let token = mint_token(SECRET, Some("ops@example.com"), now() + 3600);
    let parts = parts_with(&[(header::AUTHORIZATION.as_str(), format!("Bearer {token}"))]);

    let session = provider.current_session(&parts).await.unwrap();

    assert_eq!(session.subject, "admin-1");
    assert_eq!(session.email.as_deref(), Some("ops@example.com"));
}

#[tokio::test]
async fn test_cookie_token_yields_session() {
    let provider = JwtSessionProvider::new(SECRET, false);
    let token = mint_token(SECRET, None, now() + 3600);
    let parts = parts_with(&[(
        header::COOKIE.as_str(),
        format!("theme=dark; {SESSION_COOKIE}={token}; other=1"),
    )]);

    let session = provider.current_session(&parts).await.unwrap();

    assert_eq!(session.email, None);
}

#[tokio::test]
async fn test_expired_token_yields_no_session() {
    let provider = JwtSessionProvider::new(SECRET, false);
    let token = mint_token(SECRET, Some("ops@example.com"), now() - 3600);
    let parts = parts_with(&[(header::AUTHORIZATION.as_str(), format!("Bearer {token}"))]);

    assert!(provider.current_session(&parts).await.is_none());
}

#[tokio::test]
async fn test_wrong_secret_yields_no_session() {
    let provider = JwtSessionProvider::new(SECRET, false);
    let token = mint_token("some-other-secret", Some("ops@example.com"), now() + 3600);
    let parts = parts_with(&[(header::AUTHORIZATION.as_str(), format!("Bearer {token}"))]);

    assert!(provider.current_session(&parts).await.is_none());
}

#[tokio::test]
async fn test_missing_or_malformed_credentials_yield_no_session() {
    let provider = JwtSessionProvider::new(SECRET, false);

    assert!(provider.current_session(&parts_with(&[])).await.is_none());

    let parts = parts_with(&[(header::AUTHORIZATION.as_str(), "Basic abc".to_string())]);
    assert!(provider.current_session(&parts).await.is_none());

    let parts = parts_with(&[(header::AUTHORIZATION.as_str(), "Bearer not-a-jwt".to_string())]);
    assert!(provider.current_session(&parts).await.is_none());
}

#[tokio::test]
async fn test_dev_header_only_when_enabled() {
    let parts = parts_with(&[(LOCAL_SESSION_HEADER, "dev@example.com".to_string())]);

    let enabled = JwtSessionProvider::new(SECRET, true);
    let session = enabled.current_session(&parts).await.unwrap();
    assert_eq!(session.email.as_deref(), Some("dev@example.com"));

    let disabled = JwtSessionProvider::new(SECRET, false);
    assert!(disabled.current_session(&parts).await.is_none());
}

#[tokio::test]
async fn test_default_config_ignores_dev_header() {
    let provider = JwtSessionProvider::from_config(&AppConfig::default());
    let parts = parts_with(&[(LOCAL_SESSION_HEADER, "anyone@example.com".to_string())]);

    assert!(provider.current_session(&parts).await.is_none());
}

#[tokio::test]
async fn test_current_session_extractor_uses_state_provider() {
    let state = AppState {
        repo: Arc::new(InMemoryLanderRepository::default()),
        intake: Arc::new(MemoryIntakeSink::new()),
        sessions: Arc::new(JwtSessionProvider::new(SECRET, false)),
        config: AppConfig::default(),
    };
    let token = mint_token(SECRET, Some("ops@example.com"), now() + 3600);
    let mut parts = parts_with(&[(header::AUTHORIZATION.as_str(), format!("Bearer {token}"))]);

    let CurrentSession(session) = CurrentSession::from_request_parts(&mut parts, &state)
        .await
        .unwrap();
    assert!(session.is_some());

    let mut anonymous = parts_with(&[]);
    let CurrentSession(session) = CurrentSession::from_request_parts(&mut anonymous, &state)
        .await
        .unwrap();
    assert!(session.is_none());
}

#[test]
fn test_admin_gate_states() {
    assert_eq!(admin_gate(None), AdminGate::Unauthenticated);
    assert_eq!(
        admin_gate(Some(Session {
            subject: "admin-1".to_string(),
            email: None,
        })),
        AdminGate::Authenticated { user_email: None }
    );
}
