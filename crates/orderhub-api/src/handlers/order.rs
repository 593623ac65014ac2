//! Order-event hooks fed by the order CRUD layer.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::debug;

use crate::dto::request::{OrderCreatedRequest, OrderStatusChangedRequest};
use crate::dto::response::EventAccepted;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/orders/events/created
pub async fn order_created(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<OrderCreatedRequest>,
) -> Result<(StatusCode, Json<EventAccepted>), ApiError> {
    let order_id = body.order.id;
    let outcome = state.notifier.order_created(body.order);
    debug!(order_id = %order_id, ?outcome, "Order created hook");
    Ok((StatusCode::ACCEPTED, Json(EventAccepted::from(outcome))))
}

/// POST /api/orders/events/status-changed
pub async fn order_status_changed(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<OrderStatusChangedRequest>,
) -> Result<(StatusCode, Json<EventAccepted>), ApiError> {
    let order_id = body.order.id;
    let outcome = state
        .notifier
        .order_status_changed(body.order, body.old_status);
    debug!(order_id = %order_id, ?outcome, "Order status hook");
    Ok((StatusCode::ACCEPTED, Json(EventAccepted::from(outcome))))
}
