//! Discount Caps
//!
//! A repeatable discount accrues a fixed amount each time it is earned (once per approved
//! review, for example). A cap bounds how many of those applications count and how large the
//! accrued total may grow.

use rusty_money::{Money, MoneyError, iso::Currency};

use crate::discounts::{DiscountCategory, DiscountError};

/// Limits on a repeatable discount
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiscountCap<'a> {
    max_applications: Option<u32>,
    max_amount: Option<Money<'a, Currency>>,
}

impl<'a> DiscountCap<'a> {
    /// A cap that counts every application and never limits the total.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_applications: None,
            max_amount: None,
        }
    }

    /// Count at most `limit` applications.
    #[must_use]
    pub fn max_applications(self, limit: u32) -> Self {
        Self {
            max_applications: Some(limit),
            ..self
        }
    }

    /// Never let the accrued total exceed `limit`.
    #[must_use]
    pub fn max_amount(self, limit: Money<'a, Currency>) -> Self {
        Self {
            max_amount: Some(limit),
            ..self
        }
    }

    /// Application limit, if any.
    pub const fn application_limit(&self) -> Option<u32> {
        self.max_applications
    }

    /// Monetary limit, if any.
    pub const fn monetary_limit(&self) -> Option<&Money<'a, Currency>> {
        self.max_amount.as_ref()
    }

    /// Total accrued by `applications` applications of `per_unit`, after both limits.
    ///
    /// A negative monetary limit caps the total at zero.
    ///
    /// # Errors
    ///
    /// - [`DiscountError::NegativeAmount`]: `per_unit` is negative.
    /// - [`DiscountError::Money`]: the monetary limit is in a different currency from `per_unit`.
    pub fn apply(
        &self,
        category: DiscountCategory,
        per_unit: &Money<'a, Currency>,
        applications: u32,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        if per_unit.is_negative() {
            return Err(DiscountError::NegativeAmount(category));
        }

        let counted = self
            .max_applications
            .map_or(applications, |limit| applications.min(limit));

        let accrued = per_unit.to_minor_units().saturating_mul(i64::from(counted));

        let capped = match self.max_amount {
            Some(limit) if limit.currency() != per_unit.currency() => {
                return Err(MoneyError::CurrencyMismatch {
                    expected: per_unit.currency().iso_alpha_code,
                    actual: limit.currency().iso_alpha_code,
                }
                .into());
            }
            Some(limit) if limit.is_negative() => 0,
            Some(limit) => accrued.min(limit.to_minor_units()),
            None => accrued,
        };

        Ok(Money::from_minor(capped, per_unit.currency()))
    }
}
