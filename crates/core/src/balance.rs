//! Balance Calculator
//!
//! Derives the payment still due on a booking from its list price, the deposit already paid and
//! the discounts it carries:
//!
//! ```text
//! final_balance = max(0, list_price - deposit - sum(discounts))
//! ```

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::discounts::{DiscountError, DiscountSet};

/// Errors raised while calculating a balance.
#[derive(Debug, Error, PartialEq)]
pub enum BalanceError {
    /// The list price is negative.
    #[error("list price cannot be negative")]
    NegativeListPrice,

    /// The deposit is negative.
    #[error("deposit cannot be negative")]
    NegativeDeposit,

    /// A discount could not be totalled.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Outcome of a balance calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance<'a> {
    /// Sum of every discount category, uncapped.
    pub total_discount: Money<'a, Currency>,

    /// Remaining payment due, never below zero.
    pub final_balance: Money<'a, Currency>,
}

/// Calculates the final balance due on a booking.
///
/// The result depends only on the inputs: calling it twice yields the same balance, and the
/// order in which discount categories were recorded has no effect.
///
/// # Errors
///
/// - [`BalanceError::NegativeListPrice`] / [`BalanceError::NegativeDeposit`]: negative input.
/// - [`BalanceError::Discount`]: a discount is negative or in another currency.
/// - [`BalanceError::Money`]: the deposit is in a different currency from the list price.
pub fn calculate_balance<'a>(
    list_price: &Money<'a, Currency>,
    deposit: &Money<'a, Currency>,
    discounts: &DiscountSet<'a>,
) -> Result<Balance<'a>, BalanceError> {
    if list_price.is_negative() {
        return Err(BalanceError::NegativeListPrice);
    }

    if deposit.is_negative() {
        return Err(BalanceError::NegativeDeposit);
    }

    let currency = list_price.currency();
    let total_discount = discounts.total(currency)?;
    let remaining = list_price.sub(*deposit)?.sub(total_discount)?;

    let final_balance = if remaining.is_negative() {
        Money::from_minor(0, currency)
    } else {
        remaining
    };

    Ok(Balance {
        total_discount,
        final_balance,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::{KRW, USD};
    use testresult::TestResult;

    use crate::discounts::DiscountCategory;

    use super::*;

    fn krw(amount: i64) -> Money<'static, Currency> {
        Money::from_minor(amount, KRW)
    }

    #[test]
    fn balance_without_discounts_is_price_minus_deposit() -> TestResult {
        let balance = calculate_balance(&krw(2_000_000), &krw(500_000), &DiscountSet::new())?;

        assert_eq!(balance.total_discount, krw(0));
        assert_eq!(balance.final_balance, krw(1_500_000));

        Ok(())
    }

    #[test]
    fn every_discount_category_is_subtracted() -> TestResult {
        let discounts = DiscountSet::new()
            .with(DiscountCategory::Event, krw(100_000))
            .with(DiscountCategory::Referral, krw(50_000))
            .with(DiscountCategory::Review, krw(30_000))
            .with(DiscountCategory::Special, krw(20_000));

        let balance = calculate_balance(&krw(2_000_000), &krw(500_000), &discounts)?;

        assert_eq!(balance.total_discount, krw(200_000));
        assert_eq!(balance.final_balance, krw(1_300_000));

        Ok(())
    }

    #[test]
    fn discounts_exceeding_price_clamp_to_zero() -> TestResult {
        let discounts = DiscountSet::new().with(DiscountCategory::Special, krw(5_000_000));

        let balance = calculate_balance(&krw(2_000_000), &krw(500_000), &discounts)?;

        assert_eq!(balance.total_discount, krw(5_000_000));
        assert_eq!(balance.final_balance, krw(0));

        Ok(())
    }

    #[test]
    fn deposit_exceeding_price_clamps_to_zero() -> TestResult {
        let balance = calculate_balance(&krw(100), &krw(200), &DiscountSet::new())?;

        assert_eq!(balance.final_balance, krw(0));

        Ok(())
    }

    #[test]
    fn calculation_is_idempotent() -> TestResult {
        let discounts = DiscountSet::new().with(DiscountCategory::Event, krw(70_000));

        let first = calculate_balance(&krw(1_000_000), &krw(100_000), &discounts)?;
        let second = calculate_balance(&krw(1_000_000), &krw(100_000), &discounts)?;

        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn negative_inputs_are_rejected() {
        assert_eq!(
            calculate_balance(&krw(-1), &krw(0), &DiscountSet::new()),
            Err(BalanceError::NegativeListPrice)
        );
        assert_eq!(
            calculate_balance(&krw(1), &krw(-1), &DiscountSet::new()),
            Err(BalanceError::NegativeDeposit)
        );
        assert_eq!(
            calculate_balance(
                &krw(1),
                &krw(0),
                &DiscountSet::new().with(DiscountCategory::Review, krw(-5))
            ),
            Err(BalanceError::Discount(DiscountError::NegativeAmount(
                DiscountCategory::Review
            )))
        );
    }

    #[test]
    fn shortfall_beyond_i64_range_still_clamps_to_zero() -> TestResult {
        let discounts = DiscountSet::new().with(DiscountCategory::Special, krw(i64::MAX));

        let balance = calculate_balance(&krw(0), &krw(i64::MAX), &discounts)?;

        assert_eq!(balance.final_balance, krw(0));
        assert!(!balance.final_balance.is_negative());

        Ok(())
    }

    #[test]
    fn full_range_discounts_are_totalled_exactly() -> TestResult {
        let discounts = DiscountSet::new()
            .with(DiscountCategory::Event, krw(i64::MAX))
            .with(DiscountCategory::Special, krw(i64::MAX));

        let balance = calculate_balance(&krw(i64::MAX), &krw(0), &discounts)?;

        assert_eq!(
            *balance.total_discount.amount(),
            Decimal::from(i64::MAX) * Decimal::TWO
        );
        assert_eq!(balance.final_balance, krw(0));

        Ok(())
    }

    #[test]
    fn negative_inputs_beyond_i64_range_are_rejected() {
        let huge_negative = Money::from_decimal(Decimal::from(i64::MIN) * Decimal::TWO, KRW);

        assert_eq!(
            calculate_balance(&huge_negative, &krw(0), &DiscountSet::new()),
            Err(BalanceError::NegativeListPrice)
        );
        assert_eq!(
            calculate_balance(&krw(1), &huge_negative, &DiscountSet::new()),
            Err(BalanceError::NegativeDeposit)
        );
        assert_eq!(
            calculate_balance(
                &krw(1),
                &krw(0),
                &DiscountSet::new().with(DiscountCategory::Event, huge_negative)
            ),
            Err(BalanceError::Discount(DiscountError::NegativeAmount(
                DiscountCategory::Event
            )))
        );
    }

    #[test]
    fn deposit_in_other_currency_is_rejected() {
        let result = calculate_balance(
            &krw(1_000),
            &Money::from_minor(10, USD),
            &DiscountSet::new(),
        );

        assert!(matches!(result, Err(BalanceError::Money(_))));
    }
}
