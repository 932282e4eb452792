use lander_gate::{
    AppState, DisabledIntakeSink, InMemoryLanderRepository, IntakeState, JwtSessionProvider,
    PostgresIntakeSink, PostgresLanderRepository, RepositoryState, SessionState,
    config::{AppConfig, Env},
    create_router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lander_gate=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);
    if config.allow_dev_session_header {
        tracing::warn!("ALLOW_DEV_SESSION_HEADER set: x-session-email is accepted as an admin session");
    }

    // Storage: Postgres when configured, otherwise an in-memory lander store and the
    // disabled intake sink.
    let (repo, intake): (RepositoryState, IntakeState) = match &config.db_url {
        Some(db_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(db_url)
                .await
                .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");
            (
                Arc::new(PostgresLanderRepository::new(pool.clone())) as RepositoryState,
                Arc::new(PostgresIntakeSink::new(pool)) as IntakeState,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set: conversions will not be persisted");
            let repo = match &config.landers_file {
                Some(path) => InMemoryLanderRepository::from_seed_file(path).await,
                None => InMemoryLanderRepository::default(),
            };
            (
                Arc::new(repo) as RepositoryState,
                Arc::new(DisabledIntakeSink) as IntakeState,
            )
        }
    };

    let sessions = Arc::new(JwtSessionProvider::from_config(&config)) as SessionState;
    let bind_addr = config.bind_addr.clone();

    let app_state = AppState {
        repo,
        intake,
        sessions,
        config,
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
