//! Discount rule kinds.

use serde::{Deserialize, Serialize};

/// How a campaign's `discount_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the purchase total.
    Percentage,
    /// `discount_value` is a flat amount.
    Fixed,
}
