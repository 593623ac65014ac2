//! Shared domain types.

pub mod discount;
pub mod id;
pub mod usage_limit;

pub use discount::DiscountType;
pub use id::{CampaignId, ConnectionId, OrderId, UserId};
pub use usage_limit::UsageLimit;
