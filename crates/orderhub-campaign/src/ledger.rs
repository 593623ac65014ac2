//! Redemption ledger: grants a campaign to a user and records it.
//!
//! Check-then-increment for a given `(user, campaign)` pair runs under a
//! per-pair async mutex. The campaign-wide counter is guarded by the
//! store's conditional increment, so concurrent redemptions by different
//! users of the same campaign can never push `used_count` past the cap.
//! Pairs that differ in either user or campaign never contend.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use orderhub_core::config::DiscountPolicy;
use orderhub_core::types::{CampaignId, UserId};

use crate::discount::compute_discount;
use crate::error::RedemptionError;
use crate::model::{Campaign, RedemptionQuote, RedemptionRequest, UserCampaignRedemption};
use crate::store::CampaignStore;
use crate::validity::{InvalidityReason, check_validity};

type PairKey = (UserId, CampaignId);

/// Attempts at undoing a campaign increment before giving up.
const ROLLBACK_ATTEMPTS: u32 = 3;

/// Base delay between rollback attempts.
const ROLLBACK_BACKOFF: Duration = Duration::from_millis(20);

/// Grants and records campaign redemptions.
#[derive(Debug)]
pub struct RedemptionLedger {
    /// Backing store.
    store: Arc<dyn CampaignStore>,
    /// Overdraw policy for flat discounts.
    policy: DiscountPolicy,
    /// One mutex per pair currently being redeemed.
    locks: DashMap<PairKey, Arc<Mutex<()>>>,
    /// Counters.
    metrics: LedgerMetrics,
}

impl RedemptionLedger {
    /// Creates a ledger over `store`.
    pub fn new(store: Arc<dyn CampaignStore>, policy: DiscountPolicy) -> Self {
        Self {
            store,
            policy,
            locks: DashMap::new(),
            metrics: LedgerMetrics::default(),
        }
    }

    /// Redeem `request.code` for `user_id`, incrementing both counters.
    pub async fn redeem(
        &self,
        user_id: UserId,
        request: &RedemptionRequest,
        now: DateTime<Utc>,
    ) -> Result<RedemptionQuote, RedemptionError> {
        let result = self.redeem_inner(user_id, request, now).await;
        match &result {
            Ok(quote) => {
                self.metrics.granted.fetch_add(1, Ordering::Relaxed);
                info!(
                    user_id = %user_id,
                    campaign_id = %quote.campaign.id,
                    code = %quote.campaign.code,
                    discount = %quote.discount,
                    used_count = quote.campaign.used_count,
                    "Campaign redeemed"
                );
            }
            Err(e) if e.is_rejection() => {
                self.metrics.rejected.fetch_add(1, Ordering::Relaxed);
                debug!(user_id = %user_id, code = %request.code, reason = e.reason_code(), "Redemption rejected");
            }
            Err(e) => {
                self.metrics.failed.fetch_add(1, Ordering::Relaxed);
                error!(user_id = %user_id, code = %request.code, error = %e, "Redemption failed");
            }
        }
        result
    }

    /// Quote what `redeem` would grant without touching any counter.
    pub async fn preview(
        &self,
        user_id: UserId,
        request: &RedemptionRequest,
        now: DateTime<Utc>,
    ) -> Result<RedemptionQuote, RedemptionError> {
        let campaign = self.load_valid(request, now).await?;

        let redemption = self
            .store
            .find_redemption(user_id, campaign.id)
            .await?
            .unwrap_or_else(|| UserCampaignRedemption::new(user_id, campaign.id));
        if !redemption.can_use(campaign.user_limit) {
            return Err(RedemptionError::UserLimitReached);
        }

        let breakdown = compute_discount(&campaign, request.total_amount, self.policy);
        Ok(RedemptionQuote {
            campaign,
            discount: breakdown.discount,
            final_amount: breakdown.final_amount,
        })
    }

    /// Snapshot of the ledger counters.
    pub fn metrics(&self) -> LedgerMetricsSnapshot {
        LedgerMetricsSnapshot {
            granted: self.metrics.granted.load(Ordering::Relaxed),
            rejected: self.metrics.rejected.load(Ordering::Relaxed),
            failed: self.metrics.failed.load(Ordering::Relaxed),
        }
    }

    async fn redeem_inner(
        &self,
        user_id: UserId,
        request: &RedemptionRequest,
        now: DateTime<Utc>,
    ) -> Result<RedemptionQuote, RedemptionError> {
        let campaign = self.load_valid(request, now).await?;
        let key = (user_id, campaign.id);

        let lock = self.lock_for(key);
        let result = {
            let _guard = lock.lock().await;
            self.apply(user_id, &campaign, request.total_amount, now).await
        };
        drop(lock);
        self.release_lock(key);

        result
    }

    /// Per-user check plus both increments. Caller holds the pair lock.
    async fn apply(
        &self,
        user_id: UserId,
        campaign: &Campaign,
        total: Decimal,
        now: DateTime<Utc>,
    ) -> Result<RedemptionQuote, RedemptionError> {
        let redemption = self
            .store
            .find_or_create_redemption(user_id, campaign.id)
            .await?;
        if !redemption.can_use(campaign.user_limit) {
            return Err(RedemptionError::UserLimitReached);
        }

        let breakdown = compute_discount(campaign, total, self.policy);

        let Some(updated) = self.store.try_increment_usage(campaign.id, now).await? else {
            return Err(RedemptionError::Expired(
                self.current_invalidity(campaign.id, now).await,
            ));
        };

        match self
            .store
            .try_increment_redemption(user_id, campaign.id, campaign.user_limit, now)
            .await
        {
            Ok(Some(_)) => Ok(RedemptionQuote {
                campaign: updated,
                discount: breakdown.discount,
                final_amount: breakdown.final_amount,
            }),
            Ok(None) => {
                self.compensate(campaign.id).await?;
                Err(RedemptionError::UserLimitReached)
            }
            Err(e) => {
                self.compensate(campaign.id).await?;
                Err(e.into())
            }
        }
    }

    /// Resolve the code and check the campaign-level rules.
    async fn load_valid(
        &self,
        request: &RedemptionRequest,
        now: DateTime<Utc>,
    ) -> Result<Campaign, RedemptionError> {
        if request.total_amount < Decimal::ZERO {
            return Err(RedemptionError::InvalidAmount);
        }

        let campaign = self
            .store
            .find_active_by_code(&request.code)
            .await?
            .ok_or_else(|| RedemptionError::NotFound {
                code: request.code.clone(),
            })?;

        check_validity(&campaign, now).map_err(RedemptionError::Expired)?;

        if request.total_amount < campaign.minimum_purchase {
            return Err(RedemptionError::BelowMinimum {
                minimum: campaign.minimum_purchase,
                total: request.total_amount,
            });
        }

        Ok(campaign)
    }

    /// Reason the campaign refused an increment, re-read from the store.
    async fn current_invalidity(&self, id: CampaignId, now: DateTime<Utc>) -> InvalidityReason {
        match self.store.find_by_id(id).await {
            Ok(Some(c)) => check_validity(&c, now)
                .err()
                .unwrap_or(InvalidityReason::UsageLimitReached),
            Ok(None) => InvalidityReason::Inactive,
            Err(e) => {
                error!(campaign_id = %id, error = %e, "Failed to re-read campaign");
                InvalidityReason::UsageLimitReached
            }
        }
    }

    /// Undo a campaign increment whose redemption half did not land.
    ///
    /// Retried up to [`ROLLBACK_ATTEMPTS`] times with a linear backoff.
    async fn compensate(&self, id: CampaignId) -> Result<(), RedemptionError> {
        let mut attempt = 1;
        loop {
            match self.store.decrement_usage(id).await {
                Ok(()) => {
                    if attempt > 1 {
                        info!(campaign_id = %id, attempt, "Campaign usage rolled back after retry");
                    }
                    return Ok(());
                }
                Err(e) if attempt < ROLLBACK_ATTEMPTS => {
                    warn!(campaign_id = %id, attempt, error = %e, "Campaign usage rollback failed, retrying");
                    tokio::time::sleep(ROLLBACK_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        campaign_id = %id,
                        attempts = attempt,
                        error = %e,
                        "Failed to roll back campaign usage increment"
                    );
                    return Err(e.into());
                }
            }
        }
    }

    fn lock_for(&self, key: PairKey) -> Arc<Mutex<()>> {
        self.locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// Drops the pair's mutex once nobody else holds or waits on it.
    fn release_lock(&self, key: PairKey) {
        self.locks.remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Ledger counters.
#[derive(Debug, Default)]
struct LedgerMetrics {
    granted: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
}

/// Serializable ledger counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMetricsSnapshot {
    /// Redemptions granted.
    pub granted: u64,
    /// Business rejections.
    pub rejected: u64,
    /// Store failures.
    pub failed: u64,
}
