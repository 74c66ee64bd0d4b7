//! Discounts
//!
//! Discount categories carried by a booking, and the rules that derive the amount of each
//! category. Categories are additive: a booking may carry any combination of them at once.

use std::fmt;

use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

pub mod cap;
pub mod event;
pub mod review;

pub use event::EventDiscount;
pub use review::ReviewDiscountPolicy;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A discount amount below zero was supplied.
    #[error("{0} discount cannot be negative")]
    NegativeAmount(DiscountCategory),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Discount category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiscountCategory {
    /// Seasonal or promotional event discount.
    Event,

    /// Partner code discount, granted to both referrer and referee.
    Referral,

    /// Discount earned by submitting approved reviews.
    Review,

    /// Manual discount entered by an administrator (e.g. the new-year special).
    Special,
}

impl DiscountCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::Event, Self::Referral, Self::Review, Self::Special];

    /// Stable lowercase name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Referral => "referral",
            Self::Review => "review",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for DiscountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discount amounts keyed by category.
///
/// A category that has never been set contributes nothing; there is no distinction between an
/// unset category and one set to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountSet<'a> {
    amounts: FxHashMap<DiscountCategory, Money<'a, Currency>>,
}

impl<'a> DiscountSet<'a> {
    /// Create an empty discount set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`DiscountSet::set`].
    #[must_use]
    pub fn with(mut self, category: DiscountCategory, amount: Money<'a, Currency>) -> Self {
        self.set(category, amount);
        self
    }

    /// Set the amount for a category, returning the previous amount.
    pub fn set(
        &mut self,
        category: DiscountCategory,
        amount: Money<'a, Currency>,
    ) -> Option<Money<'a, Currency>> {
        self.amounts.insert(category, amount)
    }

    /// Remove a category, returning its amount.
    pub fn clear(&mut self, category: DiscountCategory) -> Option<Money<'a, Currency>> {
        self.amounts.remove(&category)
    }

    /// Amount recorded for a category, if any.
    #[must_use]
    pub fn get(&self, category: DiscountCategory) -> Option<&Money<'a, Currency>> {
        self.amounts.get(&category)
    }

    /// Amount recorded for a category, or zero in `currency` when unset.
    #[must_use]
    pub fn amount_or_zero(
        &self,
        category: DiscountCategory,
        currency: &'a Currency,
    ) -> Money<'a, Currency> {
        self.get(category)
            .copied()
            .unwrap_or_else(|| Money::from_minor(0, currency))
    }

    /// Iterate over the categories that carry an amount.
    pub fn iter(&self) -> impl Iterator<Item = (DiscountCategory, &Money<'a, Currency>)> {
        self.amounts.iter().map(|(category, amount)| (*category, amount))
    }

    /// Returns `true` when no category carries an amount.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Sum every category in `currency`.
    ///
    /// # Errors
    ///
    /// - [`DiscountError::NegativeAmount`]: a category carries a negative amount.
    /// - [`DiscountError::Money`]: a category is in a different currency.
    pub fn total(&self, currency: &'a Currency) -> Result<Money<'a, Currency>, DiscountError> {
        self.iter()
            .try_fold(Money::from_minor(0, currency), |acc, (category, amount)| {
                if amount.is_negative() {
                    return Err(DiscountError::NegativeAmount(category));
                }

                Ok(acc.add(*amount)?)
            })
    }
}

impl<'a> FromIterator<(DiscountCategory, Money<'a, Currency>)> for DiscountSet<'a> {
    fn from_iter<I: IntoIterator<Item = (DiscountCategory, Money<'a, Currency>)>>(
        iter: I,
    ) -> Self {
        Self {
            amounts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{KRW, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn total_of_empty_set_is_zero() -> TestResult {
        let set = DiscountSet::new();

        assert_eq!(set.total(KRW)?, Money::from_minor(0, KRW));
        assert!(set.is_empty());

        Ok(())
    }

    #[test]
    fn total_sums_every_category() -> TestResult {
        let set = DiscountSet::new()
            .with(DiscountCategory::Event, Money::from_minor(100_000, KRW))
            .with(DiscountCategory::Referral, Money::from_minor(50_000, KRW))
            .with(DiscountCategory::Review, Money::from_minor(30_000, KRW))
            .with(DiscountCategory::Special, Money::from_minor(20_000, KRW));

        assert_eq!(set.total(KRW)?, Money::from_minor(200_000, KRW));

        Ok(())
    }

    #[test]
    fn set_replaces_previous_amount() {
        let mut set = DiscountSet::new();

        set.set(DiscountCategory::Special, Money::from_minor(10, KRW));
        let previous = set.set(DiscountCategory::Special, Money::from_minor(20, KRW));

        assert_eq!(previous, Some(Money::from_minor(10, KRW)));
        assert_eq!(
            set.get(DiscountCategory::Special),
            Some(&Money::from_minor(20, KRW))
        );
    }

    #[test]
    fn unset_category_reads_as_zero() {
        let set = DiscountSet::new().with(DiscountCategory::Event, Money::from_minor(5, KRW));

        assert_eq!(
            set.amount_or_zero(DiscountCategory::Review, KRW),
            Money::from_minor(0, KRW)
        );
    }

    #[test]
    fn total_rejects_negative_amount() {
        let set = DiscountSet::new().with(DiscountCategory::Special, Money::from_minor(-1, KRW));

        assert_eq!(
            set.total(KRW),
            Err(DiscountError::NegativeAmount(DiscountCategory::Special))
        );
    }

    #[test]
    fn total_rejects_currency_mismatch() {
        let set = DiscountSet::new().with(DiscountCategory::Event, Money::from_minor(5, USD));

        assert!(matches!(set.total(KRW), Err(DiscountError::Money(_))));
    }

    #[test]
    fn category_names_are_stable() {
        let names: Vec<&str> = DiscountCategory::ALL
            .iter()
            .map(|category| category.as_str())
            .collect();

        assert_eq!(names, ["event", "referral", "review", "special"]);
        assert_eq!(DiscountCategory::Review.to_string(), "review");
    }
}
