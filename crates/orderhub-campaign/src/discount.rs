//! Discount computation.

use rust_decimal::{Decimal, RoundingStrategy};

use orderhub_core::config::DiscountPolicy;

use crate::model::{Campaign, DiscountType};

/// Discount and resulting amount for a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountBreakdown {
    /// Discount granted, rounded to cents.
    pub discount: Decimal,
    /// `total - discount`.
    pub final_amount: Decimal,
}

/// Compute the discount a campaign grants on `total`.
///
/// Under [`DiscountPolicy::AllowNegative`] a flat discount larger than the
/// total yields a negative final amount.
pub fn compute_discount(
    campaign: &Campaign,
    total: Decimal,
    policy: DiscountPolicy,
) -> DiscountBreakdown {
    let raw = match campaign.discount_type {
        DiscountType::Percentage => total * campaign.discount_value / Decimal::ONE_HUNDRED,
        DiscountType::Fixed => campaign.discount_value,
    };
    let mut discount = raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    if policy == DiscountPolicy::Clamp && discount > total {
        discount = total;
    }

    let final_amount = total - discount;
    if final_amount < Decimal::ZERO {
        tracing::warn!(
            code = %campaign.code,
            total = %total,
            discount = %discount,
            "Discount exceeds purchase total; final amount is negative"
        );
    }

    DiscountBreakdown {
        discount,
        final_amount,
    }
}
