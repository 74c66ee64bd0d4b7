//! Pricing Policy
//!
//! Binds the configured currency and discount amounts to the pricing rules in `reelbook`.

use std::num::TryFromIntError;

use reelbook::{
    discounts::{DiscountError, EventDiscount, ReviewDiscountPolicy, cap::DiscountCap},
    pricing::{PricingError, PricingSnapshot},
    referral::ReferralPolicy,
};
use rusty_money::{Findable, Money, iso::Currency};
use thiserror::Error;

use crate::{config::PricingConfig, domain::events::records::EventOffer};

/// Errors raised while building a [`PricingPolicy`] from configuration.
#[derive(Debug, Error)]
pub enum PricingPolicyError {
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("discount amount out of range")]
    OutOfRange(#[from] TryFromIntError),
}

/// Errors raised while applying the pricing rules to stored amounts.
#[derive(Debug, Error)]
pub enum PricingRuleError {
    #[error("amount out of range")]
    OutOfRange(#[from] TryFromIntError),

    #[error(transparent)]
    Discount(#[from] DiscountError),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Currency and discount amounts used by every repricing operation
#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    currency: &'static Currency,
    referral: ReferralPolicy<'static>,
    reviews: ReviewDiscountPolicy<'static>,
}

impl PricingPolicy {
    /// Build a policy from CLI/environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency code is unknown or an amount does not fit in `i64`.
    pub fn from_config(config: &PricingConfig) -> Result<Self, PricingPolicyError> {
        let code = config.currency.trim().to_uppercase();

        let Some(currency) = Currency::find(&code) else {
            return Err(PricingPolicyError::UnknownCurrency(code));
        };

        let referral = ReferralPolicy::new(to_money(config.referral_discount, currency)?);
        let per_review = to_money(config.review_discount, currency)?;

        let mut cap = DiscountCap::unlimited();

        if config.review_discount_max_reviews > 0 {
            cap = cap.max_applications(config.review_discount_max_reviews);
        }

        if let Some(amount) = config.review_discount_max_amount {
            cap = cap.max_amount(to_money(amount, currency)?);
        }

        Ok(Self {
            currency,
            referral,
            reviews: ReviewDiscountPolicy::new(per_review, cap),
        })
    }

    #[must_use]
    pub const fn currency(&self) -> &'static Currency {
        self.currency
    }

    #[must_use]
    pub const fn referral(&self) -> &ReferralPolicy<'static> {
        &self.referral
    }

    /// Referral discount granted to each party, in minor units.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured amount is negative.
    pub fn referral_discount(&self) -> Result<u64, PricingRuleError> {
        Ok(u64::try_from(self.referral.amount().to_minor_units())?)
    }

    /// Review discount earned by `approved_reviews` approved reviews, in minor units.
    ///
    /// # Errors
    ///
    /// Returns an error if the review policy cannot be applied.
    pub fn review_discount(&self, approved_reviews: u32) -> Result<u64, PricingRuleError> {
        let discount = self.reviews.discount_for(approved_reviews)?;

        Ok(u64::try_from(discount.to_minor_units())?)
    }

    /// Event discount granted on `list_price`, in minor units.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount is out of range or the percentage cannot be applied.
    pub fn event_discount(&self, offer: EventOffer, list_price: u64) -> Result<u64, PricingRuleError> {
        let discount = match offer {
            EventOffer::PercentageOff { basis_points } => {
                EventDiscount::from_basis_points(basis_points)
            }
            EventOffer::AmountOff { amount } => {
                EventDiscount::AmountOff(to_money(amount, self.currency)?)
            }
        };

        let amount = discount.amount_for(&to_money(list_price, self.currency)?)?;

        Ok(u64::try_from(amount.to_minor_units())?)
    }

    /// Recompute the final balance of `pricing`.
    ///
    /// # Errors
    ///
    /// Returns an error if the balance cannot be calculated.
    pub fn reprice(&self, pricing: PricingSnapshot) -> Result<PricingSnapshot, PricingRuleError> {
        Ok(pricing.repriced(self.currency)?)
    }
}

fn to_money(minor: u64, currency: &'static Currency) -> Result<Money<'static, Currency>, TryFromIntError> {
    Ok(Money::from_minor(i64::try_from(minor)?, currency))
}
