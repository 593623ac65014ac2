//! Campaign validity evaluation, independent of any particular user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Campaign;

/// Why a campaign cannot be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidityReason {
    /// Switched off by an administrator.
    Inactive,
    /// The validity window has not opened yet.
    NotStarted,
    /// The validity window has closed.
    Ended,
    /// The campaign-wide usage cap is exhausted.
    UsageLimitReached,
}

impl InvalidityReason {
    /// Human-readable explanation.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Inactive => "campaign is not active",
            Self::NotStarted => "campaign has not started yet",
            Self::Ended => "campaign has ended",
            Self::UsageLimitReached => "campaign usage limit has been reached",
        }
    }
}

impl std::fmt::Display for InvalidityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Returns the first reason the campaign is unusable at `now`, if any.
pub fn check_validity(campaign: &Campaign, now: DateTime<Utc>) -> Result<(), InvalidityReason> {
    if !campaign.is_active {
        return Err(InvalidityReason::Inactive);
    }
    if now < campaign.start_date {
        return Err(InvalidityReason::NotStarted);
    }
    if now > campaign.end_date {
        return Err(InvalidityReason::Ended);
    }
    if !campaign.usage_limit.allows(campaign.used_count) {
        return Err(InvalidityReason::UsageLimitReached);
    }
    Ok(())
}

/// Whether the campaign is usable at `now`.
pub fn is_valid_for_use(campaign: &Campaign, now: DateTime<Utc>) -> bool {
    check_validity(campaign, now).is_ok()
}
