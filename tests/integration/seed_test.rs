//! Integration tests for campaigns declared in configuration.

use chrono::{Duration, Utc};
use http::StatusCode;
use rust_decimal_macros::dec;
use serde_json::json;

use orderhub_api::build_state;
use orderhub_api::router::build_router;
use orderhub_core::config::{AppConfig, CampaignSeed};
use orderhub_core::error::ErrorKind;
use orderhub_core::types::{DiscountType, UserId};

use crate::helpers::send;

fn welcome_seed(code: &str) -> CampaignSeed {
    let now = Utc::now();
    CampaignSeed {
        code: code.to_string(),
        name: "Welcome".to_string(),
        description: Some("First order discount".to_string()),
        discount_type: DiscountType::Percentage,
        discount_value: dec!(20),
        start_date: now - Duration::days(1),
        end_date: now + Duration::days(30),
        minimum_purchase: dec!(50),
        is_active: true,
        usage_limit: 100,
        user_limit: 1,
    }
}

#[tokio::test]
async fn test_configured_campaign_is_redeemable_at_startup() {
    let mut config = AppConfig::default();
    config.campaign.seeds.push(welcome_seed("hosgeldin20"));

    let state = build_state(config).await.expect("state should build");
    let router = build_router(state);
    let user = UserId::new();
    let body = json!({ "code": "HOSGELDIN20", "totalAmount": 100 });

    let first = send(router.clone(), "POST", "/api/campaigns/redeem", Some(body.clone()), Some(user)).await;
    assert_eq!(first.status, StatusCode::OK, "{:?}", first.body);
    assert_eq!(first.body["finalAmount"].as_f64(), Some(80.0));
    assert_eq!(first.body["campaign"]["name"], "Welcome");

    let second = send(router, "POST", "/api/campaigns/redeem", Some(body), Some(user)).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unseeded_server_has_no_campaigns() {
    let state = build_state(AppConfig::default()).await.expect("state should build");

    let response = send(
        build_router(state),
        "POST",
        "/api/campaigns/redeem",
        Some(json!({ "code": "HOSGELDIN20", "totalAmount": 100 })),
        Some(UserId::new()),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_seed_codes_fail_startup() {
    let mut config = AppConfig::default();
    config.campaign.seeds.push(welcome_seed("DUP"));
    config.campaign.seeds.push(welcome_seed("dup"));

    let err = build_state(config).await.expect_err("duplicate codes must fail");

    assert_eq!(err.kind, ErrorKind::Conflict);
}
