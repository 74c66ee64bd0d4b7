//! Event Discounts
//!
//! Seasonal or promotional event discounts, expressed either as a percentage of the list price or
//! as a fixed amount off.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};

use crate::discounts::DiscountError;

/// Discount granted by an event
#[derive(Debug, Copy, Clone)]
pub enum EventDiscount<'a> {
    /// Percentage of the list price (e.g. "10% off during the spring fair")
    PercentageOff(Percentage),

    /// Fixed amount off the list price (e.g. "₩100,000 off")
    AmountOff(Money<'a, Currency>),
}

impl<'a> EventDiscount<'a> {
    /// Build a percentage discount from basis points (`1_000` is 10%).
    #[must_use]
    pub fn from_basis_points(basis_points: u32) -> Self {
        Self::PercentageOff(Percentage::from(f64::from(basis_points) / 10_000.0))
    }

    /// Calculate the discount amount this event grants on `list_price`.
    ///
    /// The result never exceeds the list price and is never negative.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if:
    /// - Percentage calculation overflows or cannot be safely represented.
    /// - The fixed amount is in a different currency from the list price.
    pub fn amount_for(
        &self,
        list_price: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let price_minor = list_price.to_minor_units();

        let discount_minor = match self {
            EventDiscount::PercentageOff(pct) => percent_of_minor(pct, price_minor)?,
            EventDiscount::AmountOff(amount) => {
                if amount.currency() != list_price.currency() {
                    return Err(MoneyError::CurrencyMismatch {
                        expected: list_price.currency().iso_alpha_code,
                        actual: amount.currency().iso_alpha_code,
                    }
                    .into());
                }

                amount.to_minor_units()
            }
        };

        Ok(Money::from_minor(
            discount_minor.clamp(0, price_minor.max(0)),
            list_price.currency(),
        ))
    }
}

/// Calculate a percentage of a minor unit amount, rounding half away from zero.
fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{KRW, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percentage_off_takes_share_of_list_price() -> TestResult {
        let discount = EventDiscount::PercentageOff(Percentage::from(0.25));
        let amount = discount.amount_for(&Money::from_minor(2_000_000, KRW))?;

        assert_eq!(amount, Money::from_minor(500_000, KRW));

        Ok(())
    }

    #[test]
    fn basis_points_build_percentage() -> TestResult {
        let discount = EventDiscount::from_basis_points(5_000);
        let amount = discount.amount_for(&Money::from_minor(1_000_000, KRW))?;

        assert_eq!(amount, Money::from_minor(500_000, KRW));

        Ok(())
    }

    #[test]
    fn percentage_rounds_half_away_from_zero() -> TestResult {
        let discount = EventDiscount::PercentageOff(Percentage::from(0.5));
        let amount = discount.amount_for(&Money::from_minor(101, KRW))?;

        assert_eq!(amount, Money::from_minor(51, KRW));

        Ok(())
    }

    #[test]
    fn amount_off_is_returned_as_is() -> TestResult {
        let discount = EventDiscount::AmountOff(Money::from_minor(100_000, KRW));
        let amount = discount.amount_for(&Money::from_minor(2_000_000, KRW))?;

        assert_eq!(amount, Money::from_minor(100_000, KRW));

        Ok(())
    }

    #[test]
    fn amount_off_is_capped_at_list_price() -> TestResult {
        let discount = EventDiscount::AmountOff(Money::from_minor(3_000_000, KRW));
        let amount = discount.amount_for(&Money::from_minor(2_000_000, KRW))?;

        assert_eq!(amount, Money::from_minor(2_000_000, KRW));

        Ok(())
    }

    #[test]
    fn percentage_above_one_is_capped_at_list_price() -> TestResult {
        let discount = EventDiscount::PercentageOff(Percentage::from(2.0));
        let amount = discount.amount_for(&Money::from_minor(100, KRW))?;

        assert_eq!(amount, Money::from_minor(100, KRW));

        Ok(())
    }

    #[test]
    fn amount_off_in_other_currency_is_rejected() {
        let discount = EventDiscount::AmountOff(Money::from_minor(100, USD));
        let result = discount.amount_for(&Money::from_minor(1_000, KRW));

        assert_eq!(
            result,
            Err(DiscountError::Money(MoneyError::CurrencyMismatch {
                expected: KRW.iso_alpha_code,
                actual: USD.iso_alpha_code,
            }))
        );
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let percent = Percentage::from(2.0);
        let result = percent_of_minor(&percent, i64::MAX);

        assert!(matches!(result, Err(DiscountError::PercentConversion)));
    }
}
