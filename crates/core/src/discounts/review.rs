//! Review Discounts

use rusty_money::{Money, iso::Currency};

use crate::discounts::{DiscountCategory, DiscountError, cap::DiscountCap};

/// Fixed discount per approved review, subject to a cap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewDiscountPolicy<'a> {
    per_review: Money<'a, Currency>,
    cap: DiscountCap<'a>,
}

impl<'a> ReviewDiscountPolicy<'a> {
    /// Create a review discount policy.
    pub const fn new(per_review: Money<'a, Currency>, cap: DiscountCap<'a>) -> Self {
        Self { per_review, cap }
    }

    /// Amount granted for each approved review.
    pub const fn per_review(&self) -> &Money<'a, Currency> {
        &self.per_review
    }

    /// Cap applied to the accumulated discount.
    pub const fn cap(&self) -> &DiscountCap<'a> {
        &self.cap
    }

    /// Discount earned by `approved_reviews` approved reviews.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the per-review amount is negative, or the monetary cap is in
    /// a different currency.
    pub fn discount_for(&self, approved_reviews: u32) -> Result<Money<'a, Currency>, DiscountError> {
        self.cap
            .apply(DiscountCategory::Review, &self.per_review, approved_reviews)
    }
}
