//! Integration tests for health and the WebSocket route.

use http::StatusCode;
use rust_decimal_macros::dec;
use serde_json::json;

use orderhub_campaign::DiscountType;
use orderhub_core::types::UserId;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["connectedUsers"], 0);
}

#[tokio::test]
async fn test_ws_route_requires_upgrade() {
    let app = TestApp::new();

    let response = app.request("GET", "/ws", None, None).await;

    assert!(
        response.status.is_client_error(),
        "Expected a 4xx for a plain GET, got {}",
        response.status
    );
}

#[tokio::test]
async fn test_metrics_count_redemption_outcomes() {
    let app = TestApp::new();
    app.seed_campaign("COUNTED", DiscountType::Fixed, dec!(5), dec!(0), 0, 1)
        .await;
    let user = UserId::new();
    let body = json!({ "code": "COUNTED", "totalAmount": 20 });

    app.request("POST", "/api/campaigns/redeem", Some(body.clone()), Some(user))
        .await;
    app.request("POST", "/api/campaigns/redeem", Some(body), Some(user))
        .await;
    let response = app.request("GET", "/api/metrics", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["redemptions"]["granted"], 1);
    assert_eq!(response.body["redemptions"]["rejected"], 1);
    assert_eq!(response.body["redemptions"]["failed"], 0);
    assert_eq!(response.body["realtime"]["connectionsOpened"], 0);
}
