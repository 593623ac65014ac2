//! Campaign redemption handlers.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use orderhub_campaign::{RedemptionQuote, RedemptionRequest};

use crate::dto::request::RedeemRequest;
use crate::error::ApiError;
use crate::extractors::{CallerId, ValidatedJson};
use crate::state::AppState;

/// POST /api/campaigns/redeem
///
/// Applies the code for the caller, consuming one global and one per-user use.
pub async fn redeem(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    ValidatedJson(body): ValidatedJson<RedeemRequest>,
) -> Result<Json<RedemptionQuote>, ApiError> {
    let request = RedemptionRequest::from(body);
    let quote = state.ledger.redeem(user_id, &request, Utc::now()).await?;
    Ok(Json(quote))
}

/// POST /api/campaigns/preview
pub async fn preview(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    ValidatedJson(body): ValidatedJson<RedeemRequest>,
) -> Result<Json<RedemptionQuote>, ApiError> {
    let request = RedemptionRequest::from(body);
    let quote = state.ledger.preview(user_id, &request, Utc::now()).await?;
    Ok(Json(quote))
}
