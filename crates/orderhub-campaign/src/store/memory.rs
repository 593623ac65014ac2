//! In-memory campaign store for single-node deployments and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{info, warn};

use orderhub_core::error::AppError;
use orderhub_core::result::AppResult;
use orderhub_core::types::{CampaignId, UsageLimit, UserId};

use super::CampaignStore;
use crate::model::{Campaign, UserCampaignRedemption};
use crate::validity::check_validity;

/// In-memory campaign store.
///
/// Conditional increments run while holding the entry's shard write
/// guard, so check and update are a single step.
#[derive(Debug, Default)]
pub struct MemoryCampaignStore {
    /// Campaign ID → campaign.
    campaigns: DashMap<CampaignId, Campaign>,
    /// Normalized code → campaign ID.
    codes: DashMap<String, CampaignId>,
    /// (user, campaign) → redemption row.
    redemptions: DashMap<(UserId, CampaignId), UserCampaignRedemption>,
}

impl MemoryCampaignStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of redemption rows (for diagnostics).
    pub fn redemption_count(&self) -> usize {
        self.redemptions.len()
    }
}

#[async_trait]
impl CampaignStore for MemoryCampaignStore {
    async fn find_active_by_code(&self, code: &str) -> AppResult<Option<Campaign>> {
        let key = Campaign::normalize_code(code);
        let Some(id) = self.codes.get(&key).map(|r| *r.value()) else {
            return Ok(None);
        };
        Ok(self
            .campaigns
            .get(&id)
            .filter(|c| c.is_active)
            .map(|c| c.value().clone()))
    }

    async fn find_by_id(&self, id: CampaignId) -> AppResult<Option<Campaign>> {
        Ok(self.campaigns.get(&id).map(|c| c.value().clone()))
    }

    async fn insert_campaign(&self, mut campaign: Campaign) -> AppResult<Campaign> {
        campaign.code = Campaign::normalize_code(&campaign.code);

        match self.codes.entry(campaign.code.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Campaign code '{}' already exists",
                campaign.code
            ))),
            Entry::Vacant(slot) => {
                slot.insert(campaign.id);
                self.campaigns.insert(campaign.id, campaign.clone());
                info!(campaign_id = %campaign.id, code = %campaign.code, "Campaign created");
                Ok(campaign)
            }
        }
    }

    async fn try_increment_usage(
        &self,
        id: CampaignId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Campaign>> {
        let Some(mut campaign) = self.campaigns.get_mut(&id) else {
            return Ok(None);
        };

        if check_validity(&campaign, now).is_err() {
            return Ok(None);
        }

        campaign.used_count += 1;
        Ok(Some(campaign.clone()))
    }

    async fn decrement_usage(&self, id: CampaignId) -> AppResult<()> {
        let mut campaign = self
            .campaigns
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Campaign {id} not found")))?;

        if campaign.used_count == 0 {
            warn!(campaign_id = %id, "Attempted to decrement usage below zero");
            return Ok(());
        }
        campaign.used_count -= 1;
        Ok(())
    }

    async fn find_redemption(
        &self,
        user_id: UserId,
        campaign_id: CampaignId,
    ) -> AppResult<Option<UserCampaignRedemption>> {
        Ok(self
            .redemptions
            .get(&(user_id, campaign_id))
            .map(|r| r.value().clone()))
    }

    async fn find_or_create_redemption(
        &self,
        user_id: UserId,
        campaign_id: CampaignId,
    ) -> AppResult<UserCampaignRedemption> {
        Ok(self
            .redemptions
            .entry((user_id, campaign_id))
            .or_insert_with(|| UserCampaignRedemption::new(user_id, campaign_id))
            .value()
            .clone())
    }

    async fn try_increment_redemption(
        &self,
        user_id: UserId,
        campaign_id: CampaignId,
        user_limit: UsageLimit,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserCampaignRedemption>> {
        let Some(mut row) = self.redemptions.get_mut(&(user_id, campaign_id)) else {
            return Ok(None);
        };

        if !row.can_use(user_limit) {
            return Ok(None);
        }

        row.used_count += 1;
        row.last_used_at = Some(now);
        Ok(Some(row.clone()))
    }
}
