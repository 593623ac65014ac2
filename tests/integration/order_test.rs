//! Integration tests for the order-event hooks.

use http::StatusCode;
use orderhub_realtime::Frame;
use serde_json::json;

use orderhub_core::types::{OrderId, UserId};

use crate::helpers::TestApp;

fn auth(user: UserId) -> String {
    format!(r#"{{"type":"AUTH","userId":"{user}"}}"#)
}

fn order_json(owner: UserId, status: &str) -> serde_json::Value {
    json!({
        "id": OrderId::new(),
        "userId": owner,
        "status": status,
        "totalAmount": 120.5,
        "items": [{ "sku": "A-1", "quantity": 2 }]
    })
}

#[tokio::test]
async fn test_created_hook_reaches_only_owner() {
    let app = TestApp::new();
    let engine = &app.state.realtime;
    let alice = UserId::new();
    let bob = UserId::new();

    let (alice_conn, mut alice_rx) = engine.open_connection();
    let (bob_conn, mut bob_rx) = engine.open_connection();
    engine.handle_text(&alice_conn, &auth(alice));
    engine.handle_text(&bob_conn, &auth(bob));

    // Drain greetings
    assert!(matches!(alice_rx.recv().await, Some(Frame::Text(_))));
    assert!(matches!(bob_rx.recv().await, Some(Frame::Text(_))));

    let response = app
        .request(
            "POST",
            "/api/orders/events/created",
            Some(json!({ "order": order_json(alice, "pending") })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["delivered"], true);

    let Some(Frame::Text(text)) = alice_rx.recv().await else {
        panic!("expected NEW_ORDER frame");
    };
    let event: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(event["type"], "NEW_ORDER");
    assert_eq!(event["order"]["userId"], alice.to_string());
    assert_eq!(event["order"]["items"][0]["sku"], "A-1");

    assert!(bob_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_status_hook_for_offline_user_is_accepted() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/orders/events/status-changed",
            Some(json!({
                "order": order_json(UserId::new(), "shipped"),
                "oldStatus": "preparing"
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["accepted"], true);
    assert_eq!(response.body["delivered"], false);
}
