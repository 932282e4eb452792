use std::env;

/// Fallback session secret for local runs. Production refuses to start without `SESSION_SECRET`.
pub const LOCAL_SESSION_SECRET: &str = "dev-secret-key-change-in-production";

/// AppConfig
///
/// Holds the service configuration. It is loaded once at startup and never mutated,
/// then handed to handlers and extractors through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and whether the dev session header
    // may be enabled at all.
    pub env: Env,
    // Postgres connection string. When absent, landers are served from memory and
    // conversions go to the disabled intake sink.
    pub db_url: Option<String>,
    // Secret used to verify session JWTs (HS256).
    pub session_secret: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Where the admin gate sends unauthenticated visitors.
    pub login_path: String,
    // Optional JSON file used to seed the in-memory lander repository.
    pub landers_file: Option<String>,
    // Accept the `x-session-email` development header as a session. Only ever true when
    // `ALLOW_DEV_SESSION_HEADER` is explicitly set and the environment is `Local`.
    pub allow_dev_session_header: bool,
}

/// Env
///
/// Runtime context. `Local` enables pretty logs, `Production` switches to JSON logs and
/// requires every secret to be set.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe, non-panicking values for test scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            db_url: None,
            session_secret: "super-secure-test-secret-value-local".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            login_path: "/auth/login".to_string(),
            landers_file: None,
            allow_dev_session_header: false,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production when `SESSION_SECRET` is missing, so the service never
    /// starts verifying sessions against the development secret.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let session_secret = match env {
            Env::Production => env::var("SESSION_SECRET")
                .expect("FATAL: SESSION_SECRET must be set in production."),
            Env::Local => {
                env::var("SESSION_SECRET").unwrap_or_else(|_| LOCAL_SESSION_SECRET.to_string())
            }
        };

        // The dev header is opt-in; a missing or misspelled APP_ENV must not enable it.
        let allow_dev_session_header = env == Env::Local && flag_var("ALLOW_DEV_SESSION_HEADER");

        Self {
            env,
            db_url: non_empty_var("DATABASE_URL"),
            session_secret,
            bind_addr: non_empty_var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            login_path: non_empty_var("LOGIN_PATH").unwrap_or_else(|| "/auth/login".to_string()),
            landers_file: non_empty_var("LANDERS_FILE"),
            allow_dev_session_header,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn flag_var(key: &str) -> bool {
    matches!(
        non_empty_var(key).as_deref().map(str::trim),
        Some("1") | Some("true") | Some("yes")
    )
}
