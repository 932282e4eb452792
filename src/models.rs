use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

// --- Core Records ---

/// Lander
///
/// A landing-page record from the `landers` table. This service only reads landers;
/// they are authored elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Lander {
    pub id: String,
    pub campaign_id: String,
    pub title: String,
    pub body: String,
    // Call-to-action label.
    pub cta: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// ConversionEvent
///
/// A validated conversion, ready to be handed to an `IntakeSink`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConversionEvent {
    pub id: Uuid,
    pub campaign_id: String,
    pub click_session_id: String,
    pub value: Option<f64>,
    pub currency: Option<String>,
    pub order_id: Option<String>,
    /// Set when the submitting User-Agent matched a known automation signature.
    /// Recorded for downstream filtering only; intake never rejects on it.
    pub bot_traffic: bool,
    #[ts(type = "string")]
    pub received_at: DateTime<Utc>,
}

impl ConversionEvent {
    /// from_body
    ///
    /// Builds an event from a loosely typed intake body.
    ///
    /// `campaignId` and `clickSessionId` must both be non-empty strings; anything else
    /// (missing, null, wrong type, "") fails validation. Optional fields of the wrong
    /// JSON type are dropped from the typed event rather than rejected.
    pub fn from_body(body: &Value, bot_traffic: bool) -> Result<Self, ApiError> {
        let empty = Map::new();
        let fields = body.as_object().unwrap_or(&empty);

        let campaign_id = required_str(fields, "campaignId").ok_or(ApiError::Validation)?;
        let click_session_id =
            required_str(fields, "clickSessionId").ok_or(ApiError::Validation)?;

        Ok(Self {
            id: Uuid::new_v4(),
            campaign_id,
            click_session_id,
            value: fields.get("value").and_then(Value::as_f64),
            currency: optional_str(fields, "currency"),
            order_id: optional_str(fields, "orderId"),
            bot_traffic,
            received_at: Utc::now(),
        })
    }
}

fn required_str(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn optional_str(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_owned)
}

// --- Request Payloads ---

/// ConversionRequest
///
/// Documented shape of the intake body. The endpoint reads the raw JSON so it can echo
/// it back verbatim; this struct exists for the OpenAPI schema.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    #[schema(example = "c1")]
    pub campaign_id: Option<String>,
    #[schema(example = "s1")]
    pub click_session_id: Option<String>,
    pub value: Option<f64>,
    #[schema(example = "USD")]
    pub currency: Option<String>,
    pub order_id: Option<String>,
}

// --- Response Payloads ---

/// ConversionAccepted
///
/// Acknowledgment for `POST /api/conversions`. `conversion` echoes the request body
/// exactly as received, including fields this service does not interpret.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ConversionAccepted {
    #[schema(example = "queued")]
    pub status: String,
    #[schema(value_type = Object)]
    pub conversion: Value,
}

impl ConversionAccepted {
    pub fn queued(conversion: Value) -> Self {
        Self {
            status: "queued".to_string(),
            conversion,
        }
    }
}

/// LanderResponse
///
/// Envelope for `GET /api/landers/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LanderResponse {
    pub lander: Lander,
}

/// SessionInfo
///
/// Output of `GET /api/admin/session`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SessionInfo {
    pub email: Option<String>,
}

/// LanderSeed
///
/// On-disk shape of the optional lander seed file: `{ "landers": [...] }`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LanderSeed {
    #[serde(default)]
    pub landers: Vec<Lander>,
}
