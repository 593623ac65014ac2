//! Campaign and redemption records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderhub_core::types::{CampaignId, UsageLimit, UserId};

pub use orderhub_core::types::DiscountType;

/// A promotional code with a discount rule, validity window, and usage caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// Campaign ID.
    pub id: CampaignId,
    /// Redemption code, unique and stored upper-case.
    pub code: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Optional description shown to customers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Discount rule.
    pub discount_type: DiscountType,
    /// Percentage or flat amount, depending on `discount_type`.
    pub discount_value: Decimal,
    /// First instant the campaign may be used.
    pub start_date: DateTime<Utc>,
    /// Last instant the campaign may be used.
    pub end_date: DateTime<Utc>,
    /// Minimum purchase total required to redeem.
    #[serde(default)]
    pub minimum_purchase: Decimal,
    /// Administrative on/off switch.
    pub is_active: bool,
    /// Campaign-wide cap (`0` = unlimited).
    pub usage_limit: UsageLimit,
    /// Redemptions granted so far across all users.
    #[serde(default)]
    pub used_count: u32,
    /// Per-user cap (`0` = unlimited).
    pub user_limit: UsageLimit,
}

impl Campaign {
    /// Normalize a user-supplied code for lookup and storage.
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }
}

/// How many times one user has redeemed one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCampaignRedemption {
    /// The redeeming user.
    pub user_id: UserId,
    /// The redeemed campaign.
    pub campaign_id: CampaignId,
    /// Redemptions granted to this user for this campaign.
    pub used_count: u32,
    /// When the last redemption was granted.
    pub last_used_at: Option<DateTime<Utc>>,
    /// Whether this user may still redeem the campaign at all.
    pub is_active: bool,
}

impl UserCampaignRedemption {
    /// A fresh row for a first-time redeemer.
    pub fn new(user_id: UserId, campaign_id: CampaignId) -> Self {
        Self {
            user_id,
            campaign_id,
            used_count: 0,
            last_used_at: None,
            is_active: true,
        }
    }

    /// Whether the user may redeem once more under `user_limit`.
    pub fn can_use(&self, user_limit: UsageLimit) -> bool {
        self.is_active && user_limit.allows(self.used_count)
    }
}

/// A redemption request from the checkout flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionRequest {
    /// The code the customer entered.
    pub code: String,
    /// Purchase total before discount.
    pub total_amount: Decimal,
}

/// Outcome of a granted (or previewed) redemption.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionQuote {
    /// Campaign state after the redemption was applied.
    pub campaign: Campaign,
    /// Discount granted.
    pub discount: Decimal,
    /// `total_amount - discount`.
    pub final_amount: Decimal,
}
