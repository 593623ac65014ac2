//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::{Duration, Utc};
use http::{Request, StatusCode};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use orderhub_api::AppState;
use orderhub_api::router::build_router;
use orderhub_campaign::{Campaign, CampaignStore, DiscountType, MemoryCampaignStore};
use orderhub_core::config::AppConfig;
use orderhub_core::types::{CampaignId, UsageLimit, UserId};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for reaching the engine and ledger directly
    pub state: AppState,
    /// The in-memory campaign store behind the ledger
    pub store: Arc<MemoryCampaignStore>,
}

impl TestApp {
    /// Create a new test application over an empty store
    pub fn new() -> Self {
        let store = Arc::new(MemoryCampaignStore::new());
        let state = AppState::new(AppConfig::default(), store.clone() as Arc<dyn CampaignStore>);
        let router = build_router(state.clone());
        Self {
            router,
            state,
            store,
        }
    }

    /// Insert a running campaign
    pub async fn seed_campaign(
        &self,
        code: &str,
        discount_type: DiscountType,
        discount_value: Decimal,
        minimum_purchase: Decimal,
        usage_limit: u32,
        user_limit: u32,
    ) -> Campaign {
        let now = Utc::now();
        let campaign = Campaign {
            id: CampaignId::new(),
            code: code.to_string(),
            name: format!("{code} campaign"),
            description: None,
            discount_type,
            discount_value,
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(1),
            minimum_purchase,
            is_active: true,
            usage_limit: UsageLimit::from(usage_limit),
            used_count: 0,
            user_limit: UsageLimit::from(user_limit),
        };
        self.store
            .insert_campaign(campaign)
            .await
            .expect("Failed to seed campaign")
    }

    /// Current state of a campaign
    pub async fn campaign(&self, id: CampaignId) -> Campaign {
        self.store
            .find_by_id(id)
            .await
            .expect("Store lookup failed")
            .expect("Campaign missing")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Option<UserId>,
    ) -> TestResponse {
        send(self.router.clone(), method, path, body, user).await
    }
}

/// Send one request through a router
pub async fn send(
    router: Router,
    method: &str,
    path: &str,
    body: Option<Value>,
    user: Option<UserId>,
) -> TestResponse {
    let body_str = body
        .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
        .unwrap_or_default();

    let mut req = Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json");

    if let Some(user) = user {
        req = req.header("X-User-Id", user.to_string());
    }

    let req = req
        .body(Body::from(body_str))
        .expect("Failed to build request");

    let response = router.oneshot(req).await.expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    TestResponse { status, body }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
