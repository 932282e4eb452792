use crate::models::{Lander, LanderSeed};
use async_trait::async_trait;
use sqlx::PgPool;
use std::{collections::HashMap, path::Path, sync::Arc};

/// LanderRepository
///
/// Read-only contract for lander lookups. Handlers depend on this trait only, so the
/// Postgres store and the in-memory store are interchangeable.
///
/// Implementations never raise: storage failures are logged and reported as `None`.
#[async_trait]
pub trait LanderRepository: Send + Sync {
    async fn get_lander_by_id(&self, id: &str) -> Option<Lander>;
}

/// RepositoryState
///
/// Shared handle to the lander store held in `AppState`.
pub type RepositoryState = Arc<dyn LanderRepository>;

/// PostgresLanderRepository
///
/// Lander lookups backed by the `landers` table.
pub struct PostgresLanderRepository {
    pool: PgPool,
}

impl PostgresLanderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LanderRepository for PostgresLanderRepository {
    async fn get_lander_by_id(&self, id: &str) -> Option<Lander> {
        let result = sqlx::query_as::<_, Lander>(
            r#"
            SELECT id, campaign_id, title, body, cta, created_at, updated_at
            FROM landers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(lander) => lander,
            Err(e) => {
                tracing::error!(lander_id = %id, "get_lander_by_id error: {:?}", e);
                None
            }
        }
    }
}

/// InMemoryLanderRepository
///
/// Lander store held in a map, keyed by id. Used when no database is configured and
/// throughout the tests. The map is built once and never mutated afterwards.
#[derive(Default, Clone)]
pub struct InMemoryLanderRepository {
    landers: HashMap<String, Lander>,
}

impl InMemoryLanderRepository {
    pub fn new(landers: impl IntoIterator<Item = Lander>) -> Self {
        Self {
            landers: landers
                .into_iter()
                .map(|lander| (lander.id.clone(), lander))
                .collect(),
        }
    }

    /// from_seed_file
    ///
    /// Loads `{ "landers": [...] }` from disk. A missing or malformed file yields an
    /// empty store with an error in the log; lookups then answer "not found".
    pub async fn from_seed_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let seed = match tokio::fs::read_to_string(path).await {
            Ok(raw) => serde_json::from_str::<LanderSeed>(&raw).unwrap_or_else(|e| {
                tracing::error!(path = %path.display(), "lander seed is not valid JSON: {}", e);
                LanderSeed::default()
            }),
            Err(e) => {
                tracing::error!(path = %path.display(), "cannot read lander seed: {}", e);
                LanderSeed::default()
            }
        };
        tracing::info!(count = seed.landers.len(), "seeded in-memory lander repository");
        Self::new(seed.landers)
    }

    pub fn len(&self) -> usize {
        self.landers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landers.is_empty()
    }
}

#[async_trait]
impl LanderRepository for InMemoryLanderRepository {
    async fn get_lander_by_id(&self, id: &str) -> Option<Lander> {
        self.landers.get(id).cloned()
    }
}
