//! Campaign redemption configuration.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::DiscountType;

/// How a discount larger than the purchase total is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountPolicy {
    /// Apply the discount as-is; the final amount may go negative.
    #[default]
    AllowNegative,
    /// Cap the discount at the purchase total.
    Clamp,
}

/// Campaign redemption configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Policy for discounts exceeding the purchase total.
    #[serde(default)]
    pub discount_policy: DiscountPolicy,
    /// Campaigns inserted into the store at startup (`[[campaign.seed]]`).
    #[serde(default, rename = "seed")]
    pub seeds: Vec<CampaignSeed>,
}

/// A campaign declared in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSeed {
    /// Redemption code; normalized to upper case on insert.
    pub code: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Discount rule.
    pub discount_type: DiscountType,
    /// Percentage or flat amount.
    pub discount_value: Decimal,
    /// First instant the campaign may be used (RFC 3339).
    pub start_date: DateTime<Utc>,
    /// Last instant the campaign may be used (RFC 3339).
    pub end_date: DateTime<Utc>,
    /// Minimum purchase total.
    #[serde(default)]
    pub minimum_purchase: Decimal,
    /// Administrative on/off switch.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Campaign-wide cap, `0` for unlimited.
    #[serde(default)]
    pub usage_limit: u32,
    /// Per-user cap, `0` for unlimited.
    #[serde(default)]
    pub user_limit: u32,
}

fn default_active() -> bool {
    true
}
