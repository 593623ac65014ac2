//! Campaign persistence seam.
//!
//! The ledger only talks to the document store through this trait. The
//! two `try_increment_*` operations are conditional, so a store can
//! implement them as single atomic updates (e.g. a filtered
//! find-and-modify) and never exceed a cap even without the ledger's
//! per-key locking.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use orderhub_core::result::AppResult;
use orderhub_core::types::{CampaignId, UsageLimit, UserId};

use crate::model::{Campaign, UserCampaignRedemption};

/// Storage for campaigns and per-user redemption rows.
///
/// Implementations must be thread-safe and handle concurrent access.
#[async_trait]
pub trait CampaignStore: Send + Sync + std::fmt::Debug {
    /// Finds an active campaign by its (case-insensitive) code.
    async fn find_active_by_code(&self, code: &str) -> AppResult<Option<Campaign>>;

    /// Finds a campaign by ID regardless of its state.
    async fn find_by_id(&self, id: CampaignId) -> AppResult<Option<Campaign>>;

    /// Inserts a new campaign. Fails with a conflict if the code is taken.
    async fn insert_campaign(&self, campaign: Campaign) -> AppResult<Campaign>;

    /// Increments `used_count` iff the campaign is still valid at `now`.
    ///
    /// Returns the updated campaign, or `None` if the condition failed.
    async fn try_increment_usage(
        &self,
        id: CampaignId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Campaign>>;

    /// Reverts one prior increment of `used_count`.
    async fn decrement_usage(&self, id: CampaignId) -> AppResult<()>;

    /// Returns the redemption row for the pair, if it exists.
    async fn find_redemption(
        &self,
        user_id: UserId,
        campaign_id: CampaignId,
    ) -> AppResult<Option<UserCampaignRedemption>>;

    /// Returns the redemption row for the pair, creating it on first use.
    async fn find_or_create_redemption(
        &self,
        user_id: UserId,
        campaign_id: CampaignId,
    ) -> AppResult<UserCampaignRedemption>;

    /// Increments the pair's `used_count` iff the row is active and below
    /// `user_limit`, stamping `last_used_at = now`.
    ///
    /// Returns the updated row, or `None` if the condition failed.
    async fn try_increment_redemption(
        &self,
        user_id: UserId,
        campaign_id: CampaignId,
        user_limit: UsageLimit,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserCampaignRedemption>>;
}
