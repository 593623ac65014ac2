//! Usage cap types shared by campaign-wide and per-user limits.

use serde::{Deserialize, Serialize};

/// A redemption cap. Stored as a plain integer where `0` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum UsageLimit {
    /// At most this many uses.
    Fixed(u32),
    /// No cap.
    Unlimited,
}

impl UsageLimit {
    /// Whether another use is allowed when `used` uses have already happened.
    pub fn allows(&self, used: u32) -> bool {
        match self {
            Self::Fixed(max) => used < *max,
            Self::Unlimited => true,
        }
    }

    /// Return the numeric limit, or `None` for unlimited.
    pub fn as_max(&self) -> Option<u32> {
        match self {
            Self::Fixed(max) => Some(*max),
            Self::Unlimited => None,
        }
    }
}

impl From<u32> for UsageLimit {
    /// `0` means unlimited.
    fn from(value: u32) -> Self {
        if value == 0 {
            Self::Unlimited
        } else {
            Self::Fixed(value)
        }
    }
}

impl From<UsageLimit> for u32 {
    fn from(limit: UsageLimit) -> u32 {
        limit.as_max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_limit() {
        let limit = UsageLimit::Fixed(3);
        assert!(limit.allows(2));
        assert!(!limit.allows(3));
        assert_eq!(limit.as_max(), Some(3));
    }

    #[test]
    fn test_unlimited() {
        let limit = UsageLimit::Unlimited;
        assert!(limit.allows(0));
        assert!(limit.allows(u32::MAX));
    }

    #[test]
    fn test_zero_means_unlimited_on_the_wire() {
        let limit: UsageLimit = serde_json::from_str("0").expect("deserialize");
        assert_eq!(limit, UsageLimit::Unlimited);
        assert_eq!(serde_json::to_string(&UsageLimit::Fixed(5)).expect("serialize"), "5");
    }
}
