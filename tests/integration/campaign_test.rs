//! Integration tests for campaign redemption over HTTP.

use futures::future::join_all;
use http::StatusCode;
use rust_decimal_macros::dec;
use serde_json::json;

use orderhub_campaign::DiscountType;
use orderhub_core::types::UserId;

use crate::helpers::{TestApp, send};

const REDEEM: &str = "/api/campaigns/redeem";
const PREVIEW: &str = "/api/campaigns/preview";

async fn welcome_campaign(app: &TestApp) -> orderhub_campaign::Campaign {
    app.seed_campaign(
        "HOSGELDIN20",
        DiscountType::Percentage,
        dec!(20),
        dec!(50),
        100,
        1,
    )
    .await
}

#[tokio::test]
async fn test_first_redemption_grants_discount() {
    let app = TestApp::new();
    let campaign = welcome_campaign(&app).await;
    let user = UserId::new();

    let response = app
        .request("POST", REDEEM, Some(json!({ "code": "HOSGELDIN20", "totalAmount": 100 })), Some(user))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["discount"].as_f64(), Some(20.0));
    assert_eq!(response.body["finalAmount"].as_f64(), Some(80.0));
    assert_eq!(response.body["campaign"]["usedCount"], 1);
    assert_eq!(app.campaign(campaign.id).await.used_count, 1);
}

#[tokio::test]
async fn test_repeat_redemption_hits_user_limit() {
    let app = TestApp::new();
    let campaign = welcome_campaign(&app).await;
    let user = UserId::new();
    let body = json!({ "code": "hosgeldin20", "totalAmount": 100 });

    let first = app.request("POST", REDEEM, Some(body.clone()), Some(user)).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app.request("POST", REDEEM, Some(body), Some(user)).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["error"], "USER_LIMIT_REACHED");
    assert_eq!(app.campaign(campaign.id).await.used_count, 1);
}

#[tokio::test]
async fn test_below_minimum_touches_nothing() {
    let app = TestApp::new();
    let campaign = welcome_campaign(&app).await;

    let response = app
        .request("POST", REDEEM, Some(json!({ "code": "HOSGELDIN20", "totalAmount": 30 })), Some(UserId::new()))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "BELOW_MINIMUM");
    assert_eq!(app.campaign(campaign.id).await.used_count, 0);
    assert_eq!(app.store.redemption_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redemptions_respect_global_cap() {
    let app = TestApp::new();
    let campaign = app
        .seed_campaign("FLASH", DiscountType::Fixed, dec!(5), dec!(0), 100, 1)
        .await;

    let requests = (0..150).map(|_| {
        let router = app.router.clone();
        tokio::spawn(async move {
            send(
                router,
                "POST",
                REDEEM,
                Some(json!({ "code": "FLASH", "totalAmount": 40 })),
                Some(UserId::new()),
            )
            .await
        })
    });

    let responses: Vec<_> = join_all(requests)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .collect();

    let granted = responses.iter().filter(|r| r.status == StatusCode::OK).count();
    let expired = responses
        .iter()
        .filter(|r| r.status == StatusCode::GONE && r.body["error"] == "EXPIRED")
        .count();

    assert_eq!(granted, 100);
    assert_eq!(expired, 50);
    assert_eq!(app.campaign(campaign.id).await.used_count, 100);
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let app = TestApp::new();

    let response = app
        .request("POST", REDEEM, Some(json!({ "code": "NOPE", "totalAmount": 10 })), Some(UserId::new()))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_missing_caller_is_unauthorized() {
    let app = TestApp::new();
    welcome_campaign(&app).await;

    let response = app
        .request("POST", REDEEM, Some(json!({ "code": "HOSGELDIN20", "totalAmount": 100 })), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_code_fails_validation() {
    let app = TestApp::new();

    let response = app
        .request("POST", REDEEM, Some(json!({ "code": "", "totalAmount": 100 })), Some(UserId::new()))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_preview_quotes_without_consuming() {
    let app = TestApp::new();
    let campaign = welcome_campaign(&app).await;
    let user = UserId::new();
    let body = json!({ "code": "HOSGELDIN20", "totalAmount": 250 });

    let preview = app.request("POST", PREVIEW, Some(body.clone()), Some(user)).await;
    assert_eq!(preview.status, StatusCode::OK);
    assert_eq!(preview.body["discount"].as_f64(), Some(50.0));
    assert_eq!(app.campaign(campaign.id).await.used_count, 0);

    let redeem = app.request("POST", REDEEM, Some(body), Some(user)).await;
    assert_eq!(redeem.status, StatusCode::OK);
}
