//! Request DTOs with validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use orderhub_campaign::RedemptionRequest;
use orderhub_core::events::{OrderSnapshot, OrderStatus};

/// Redeem or preview a campaign code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    /// Campaign code as entered by the customer.
    #[validate(length(min = 1, max = 64, message = "Campaign code is required"))]
    pub code: String,
    /// Purchase total before discount.
    pub total_amount: Decimal,
}

impl From<RedeemRequest> for RedemptionRequest {
    fn from(req: RedeemRequest) -> Self {
        Self {
            code: req.code,
            total_amount: req.total_amount,
        }
    }
}

/// Order-created hook body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedRequest {
    /// The order as persisted.
    pub order: OrderSnapshot,
}

/// Order-status-changed hook body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChangedRequest {
    /// The order after the change.
    pub order: OrderSnapshot,
    /// Status before the change.
    pub old_status: OrderStatus,
}
