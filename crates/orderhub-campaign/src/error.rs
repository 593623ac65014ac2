//! Redemption rejection reasons.

use rust_decimal::Decimal;
use thiserror::Error;

use orderhub_core::error::{AppError, ErrorKind};

use crate::validity::InvalidityReason;

/// Why a redemption was not granted.
///
/// Every variant except [`RedemptionError::Store`] is a user-visible
/// rejection; none of them leaves counters incremented.
#[derive(Debug, Error)]
pub enum RedemptionError {
    /// No active campaign carries this code.
    #[error("campaign code '{code}' not found")]
    NotFound {
        /// The code as entered.
        code: String,
    },
    /// Outside the validity window, switched off, or globally exhausted.
    #[error("campaign cannot be used: {0}")]
    Expired(InvalidityReason),
    /// Purchase total is under the campaign's minimum.
    #[error("purchase total {total} is below the minimum of {minimum}")]
    BelowMinimum {
        /// Required minimum.
        minimum: Decimal,
        /// Total supplied.
        total: Decimal,
    },
    /// This user has used the campaign as often as allowed.
    #[error("user has reached the usage limit for this campaign")]
    UserLimitReached,
    /// The purchase total is negative.
    #[error("purchase total must not be negative")]
    InvalidAmount,
    /// The campaign store failed.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl RedemptionError {
    /// Stable machine-readable reason code.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Expired(_) => "EXPIRED",
            Self::BelowMinimum { .. } => "BELOW_MINIMUM",
            Self::UserLimitReached => "USER_LIMIT_REACHED",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Whether this is a business rejection rather than an infrastructure failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

impl From<RedemptionError> for AppError {
    fn from(err: RedemptionError) -> Self {
        if let RedemptionError::Store(inner) = err {
            return inner;
        }
        let kind = match &err {
            RedemptionError::NotFound { .. } => ErrorKind::NotFound,
            RedemptionError::Expired(_) | RedemptionError::UserLimitReached => ErrorKind::Conflict,
            RedemptionError::BelowMinimum { .. } | RedemptionError::InvalidAmount => {
                ErrorKind::Validation
            }
            RedemptionError::Store(_) => unreachable!(),
        };
        AppError::new(kind, err.to_string())
    }
}
