use chrono::{TimeZone, Utc};
use lander_gate::{
    InMemoryLanderRepository, error::ApiError, models::{ConversionEvent, Lander},
    repository::LanderRepository,
};
use serde_json::json;
use std::io::Write;

#[test]
fn test_required_identifiers_must_be_non_empty_strings() {
    for body in [
        json!({}),
        json!({ "campaignId": "c1" }),
        json!({ "clickSessionId": "s1" }),
        json!({ "campaignId": "", "clickSessionId": "s1" }),
        json!({ "campaignId": "c1", "clickSessionId": null }),
        json!({ "campaignId": 5, "clickSessionId": "s1" }),
        json!("not an object"),
        json!(null),
    ] {
        let result = ConversionEvent::from_body(&body, false);
        assert!(
            matches!(result, Err(ApiError::Validation)),
            "expected validation error for {body}"
        );
    }
}

#[test]
fn test_optional_fields_of_wrong_type_are_dropped() {
    let body = json!({
        "campaignId": "c1",
        "clickSessionId": "s1",
        "value": "12.50",
        "currency": 978,
        "orderId": ""
    });

    let event = ConversionEvent::from_body(&body, false).unwrap();

    assert_eq!(event.value, None);
    assert_eq!(event.currency, None);
    // An empty order id is present-but-empty, not missing.
    assert_eq!(event.order_id.as_deref(), Some(""));
}

#[test]
fn test_zero_value_is_kept() {
    let body = json!({ "campaignId": "c1", "clickSessionId": "s1", "value": 0 });
    let event = ConversionEvent::from_body(&body, true).unwrap();
    assert_eq!(event.value, Some(0.0));
    assert!(event.bot_traffic);
}

#[test]
fn test_lander_serializes_camel_case() {
    let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let lander = Lander {
        id: "l1".to_string(),
        campaign_id: "c1".to_string(),
        title: "T".to_string(),
        body: "B".to_string(),
        cta: "Go".to_string(),
        created_at: at,
        updated_at: at,
    };

    let wire = serde_json::to_string(&lander).unwrap();

    assert!(wire.contains(r#""campaignId":"c1""#));
    assert!(wire.contains(r#""createdAt":"2025-01-02T03:04:05Z""#));
    assert!(!wire.contains("campaign_id"));
}

#[tokio::test]
async fn test_seed_file_populates_repository() {
    let path = std::env::temp_dir().join(format!("landers-{}.json", uuid::Uuid::new_v4()));
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"{{"landers":[{{"id":"l1","campaignId":"c1","title":"T","body":"B","cta":"Go",
            "createdAt":"2025-01-02T03:04:05Z","updatedAt":"2025-01-02T03:04:05Z"}}]}}"#
    )
    .unwrap();

    let repo = InMemoryLanderRepository::from_seed_file(&path).await;
    std::fs::remove_file(&path).ok();

    assert_eq!(repo.len(), 1);
    assert_eq!(repo.get_lander_by_id("l1").await.unwrap().cta, "Go");
    assert!(repo.get_lander_by_id("l2").await.is_none());
}

#[tokio::test]
async fn test_missing_seed_file_gives_empty_repository() {
    let repo = InMemoryLanderRepository::from_seed_file("/nonexistent/landers.json").await;
    assert!(repo.is_empty());
}
