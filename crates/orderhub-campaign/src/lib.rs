//! # orderhub-campaign
//!
//! Promotional campaigns for OrderHub:
//!
//! - Campaign validity evaluation (active flag, date window, global cap)
//! - Discount computation with a configurable overdraw policy
//! - The redemption ledger, which enforces global and per-user caps
//!   atomically under concurrent redemption attempts
//! - The [`CampaignStore`] seam plus an in-memory implementation
//! - Seeding the store from `[[campaign.seed]]` configuration

pub mod discount;
pub mod error;
pub mod ledger;
pub mod model;
pub mod seed;
pub mod store;
pub mod validity;

pub use error::RedemptionError;
pub use ledger::{LedgerMetricsSnapshot, RedemptionLedger};
pub use model::{Campaign, DiscountType, RedemptionQuote, RedemptionRequest, UserCampaignRedemption};
pub use seed::seed_store;
pub use store::{CampaignStore, memory::MemoryCampaignStore};
pub use validity::{InvalidityReason, check_validity, is_valid_for_use};
