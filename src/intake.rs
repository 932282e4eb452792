use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};

use crate::{error::SinkError, models::ConversionEvent};

/// IntakeSink
///
/// Downstream destination for accepted conversions. The intake endpoint only answers
/// "queued" after `submit` returns `Ok`; an `Err` becomes a 503.
#[async_trait]
pub trait IntakeSink: Send + Sync {
    async fn submit(&self, event: ConversionEvent) -> Result<(), SinkError>;
}

/// IntakeState
///
/// Shared handle to the configured sink held in `AppState`.
pub type IntakeState = Arc<dyn IntakeSink>;

/// DisabledIntakeSink
///
/// Explicit stub used when no store is configured. It accepts every event and persists
/// nothing, and says so in the log on each call.
#[derive(Clone, Default)]
pub struct DisabledIntakeSink;

#[async_trait]
impl IntakeSink for DisabledIntakeSink {
    async fn submit(&self, event: ConversionEvent) -> Result<(), SinkError> {
        tracing::warn!(
            conversion_id = %event.id,
            campaign_id = %event.campaign_id,
            "intake sink disabled: conversion acknowledged but not persisted"
        );
        Ok(())
    }
}

/// PostgresIntakeSink
///
/// Persists conversions into the `conversions` table.
pub struct PostgresIntakeSink {
    pool: PgPool,
}

impl PostgresIntakeSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IntakeSink for PostgresIntakeSink {
    async fn submit(&self, event: ConversionEvent) -> Result<(), SinkError> {
        sqlx::query(
            r#"
            INSERT INTO conversions
                (id, campaign_id, click_session_id, value, currency, order_id, bot_traffic, received_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.id)
        .bind(&event.campaign_id)
        .bind(&event.click_session_id)
        .bind(event.value)
        .bind(&event.currency)
        .bind(&event.order_id)
        .bind(event.bot_traffic)
        .bind(event.received_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(conversion_id = %event.id, "conversion persisted");
        Ok(())
    }
}

/// MemoryIntakeSink
///
/// Keeps submitted events in memory. Clones share the same buffer, so a test can hold
/// one handle and inspect what the endpoint submitted through another.
#[derive(Clone, Default)]
pub struct MemoryIntakeSink {
    events: Arc<Mutex<Vec<ConversionEvent>>>,
    /// When true, every submission fails.
    pub should_fail: bool,
}

impl MemoryIntakeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of the events accepted so far, in submission order.
    pub fn events(&self) -> Vec<ConversionEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl IntakeSink for MemoryIntakeSink {
    async fn submit(&self, event: ConversionEvent) -> Result<(), SinkError> {
        if self.should_fail {
            return Err(SinkError::Rejected("memory sink set to fail".to_string()));
        }
        let mut events = self
            .events
            .lock()
            .map_err(|_| SinkError::Rejected("memory sink lock poisoned".to_string()))?;
        events.push(event);
        Ok(())
    }
}
