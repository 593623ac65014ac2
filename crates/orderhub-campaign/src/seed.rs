//! Startup seeding of campaigns declared in configuration.

use rust_decimal::Decimal;
use tracing::info;

use orderhub_core::config::CampaignSeed;
use orderhub_core::error::AppError;
use orderhub_core::result::AppResult;
use orderhub_core::types::{CampaignId, DiscountType, UsageLimit};

use crate::model::Campaign;
use crate::store::CampaignStore;

/// Build a fresh campaign record from a configured seed.
///
/// Rejects seeds whose window is inverted or whose discount is negative
/// (or above 100 for percentages).
pub fn campaign_from_seed(seed: &CampaignSeed) -> AppResult<Campaign> {
    let code = Campaign::normalize_code(&seed.code);
    if code.is_empty() {
        return Err(AppError::configuration("Campaign seed has an empty code"));
    }
    if seed.end_date < seed.start_date {
        return Err(AppError::configuration(format!(
            "Campaign seed '{code}' ends before it starts"
        )));
    }
    let out_of_range = seed.discount_value.is_sign_negative()
        || (seed.discount_type == DiscountType::Percentage && seed.discount_value > Decimal::ONE_HUNDRED);
    if out_of_range {
        return Err(AppError::configuration(format!(
            "Campaign seed '{code}' has an out-of-range discount value {}",
            seed.discount_value
        )));
    }

    Ok(Campaign {
        id: CampaignId::new(),
        name: if seed.name.is_empty() { code.clone() } else { seed.name.clone() },
        code,
        description: seed.description.clone(),
        discount_type: seed.discount_type,
        discount_value: seed.discount_value,
        start_date: seed.start_date,
        end_date: seed.end_date,
        minimum_purchase: seed.minimum_purchase,
        is_active: seed.is_active,
        usage_limit: UsageLimit::from(seed.usage_limit),
        used_count: 0,
        user_limit: UsageLimit::from(seed.user_limit),
    })
}

/// Insert every seed into `store`. Stops at the first invalid or duplicate seed.
pub async fn seed_store(store: &dyn CampaignStore, seeds: &[CampaignSeed]) -> AppResult<usize> {
    for seed in seeds {
        let campaign = store.insert_campaign(campaign_from_seed(seed)?).await?;
        info!(
            campaign_id = %campaign.id,
            code = %campaign.code,
            usage_limit = u32::from(campaign.usage_limit),
            user_limit = u32::from(campaign.user_limit),
            "Campaign seeded"
        );
    }
    Ok(seeds.len())
}
