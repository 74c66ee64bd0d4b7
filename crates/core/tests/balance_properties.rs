//! Property-based tests for the balance calculator.
//!
//! 1. The final balance is never negative, even when the shortfall exceeds the `i64` range.
//! 2. Raising any single discount never raises the final balance.
//! 3. The order discounts are recorded in does not matter.
//! 4. The final balance is exactly `max(0, price - deposit - discounts)`.

use proptest::prelude::*;
use rusty_money::{Money, iso::KRW};

use reelbook::{
    balance::calculate_balance,
    discounts::{DiscountCategory, DiscountSet},
};

const MAX_AMOUNT: i64 = 100_000_000;

fn amount() -> impl Strategy<Value = i64> {
    0..=MAX_AMOUNT
}

fn category() -> impl Strategy<Value = DiscountCategory> {
    prop::sample::select(DiscountCategory::ALL.to_vec())
}

fn discounts() -> impl Strategy<Value = Vec<(DiscountCategory, i64)>> {
    prop::collection::vec((category(), amount()), 0..=4)
}

fn discount_set(entries: &[(DiscountCategory, i64)]) -> DiscountSet<'static> {
    entries
        .iter()
        .map(|(category, minor)| (*category, Money::from_minor(*minor, KRW)))
        .collect()
}

proptest! {
    #[test]
    fn final_balance_is_never_negative(
        price in amount(),
        deposit in amount(),
        entries in discounts(),
    ) {
        let balance = calculate_balance(
            &Money::from_minor(price, KRW),
            &Money::from_minor(deposit, KRW),
            &discount_set(&entries),
        );

        prop_assert!(balance.is_ok());

        if let Ok(balance) = balance {
            prop_assert!(balance.final_balance.to_minor_units() >= 0);
        }
    }

    #[test]
    fn final_balance_is_never_negative_across_full_range(
        price in 0..=i64::MAX,
        deposit in 0..=i64::MAX,
        entries in prop::collection::vec((category(), 0..=i64::MAX), 0..=4),
    ) {
        let balance = calculate_balance(
            &Money::from_minor(price, KRW),
            &Money::from_minor(deposit, KRW),
            &discount_set(&entries),
        );

        prop_assert!(balance.is_ok());

        if let Ok(balance) = balance {
            prop_assert!(!balance.final_balance.is_negative());
            prop_assert!(!balance.total_discount.is_negative());
        }
    }

    #[test]
    fn final_balance_matches_formula(
        price in amount(),
        deposit in amount(),
        entries in discounts(),
    ) {
        let set = discount_set(&entries);

        let expected_discount: i64 = DiscountCategory::ALL
            .iter()
            .filter_map(|category| set.get(*category))
            .map(Money::to_minor_units)
            .sum();

        let balance = calculate_balance(
            &Money::from_minor(price, KRW),
            &Money::from_minor(deposit, KRW),
            &set,
        );

        if let Ok(balance) = balance {
            prop_assert_eq!(balance.total_discount.to_minor_units(), expected_discount);
            prop_assert_eq!(
                balance.final_balance.to_minor_units(),
                (price - deposit - expected_discount).max(0)
            );
        } else {
            prop_assert!(false, "balance calculation failed for non-negative inputs");
        }
    }

    #[test]
    fn raising_a_discount_never_raises_the_balance(
        price in amount(),
        deposit in amount(),
        entries in discounts(),
        raised in category(),
        increase in 0..=MAX_AMOUNT,
    ) {
        let before = discount_set(&entries);
        let current = before
            .get(raised)
            .map_or(0, Money::to_minor_units);
        let after = before
            .clone()
            .with(raised, Money::from_minor(current + increase, KRW));

        let price = Money::from_minor(price, KRW);
        let deposit = Money::from_minor(deposit, KRW);

        let (Ok(before), Ok(after)) = (
            calculate_balance(&price, &deposit, &before),
            calculate_balance(&price, &deposit, &after),
        ) else {
            return Err(TestCaseError::fail("balance calculation failed"));
        };

        prop_assert!(after.final_balance.to_minor_units() <= before.final_balance.to_minor_units());
    }

    #[test]
    fn recording_order_does_not_matter(
        price in amount(),
        deposit in amount(),
        event in amount(),
        referral in amount(),
        review in amount(),
        special in amount(),
    ) {
        let forwards = DiscountSet::new()
            .with(DiscountCategory::Event, Money::from_minor(event, KRW))
            .with(DiscountCategory::Referral, Money::from_minor(referral, KRW))
            .with(DiscountCategory::Review, Money::from_minor(review, KRW))
            .with(DiscountCategory::Special, Money::from_minor(special, KRW));

        let backwards = DiscountSet::new()
            .with(DiscountCategory::Special, Money::from_minor(special, KRW))
            .with(DiscountCategory::Review, Money::from_minor(review, KRW))
            .with(DiscountCategory::Referral, Money::from_minor(referral, KRW))
            .with(DiscountCategory::Event, Money::from_minor(event, KRW));

        let price = Money::from_minor(price, KRW);
        let deposit = Money::from_minor(deposit, KRW);

        prop_assert_eq!(
            calculate_balance(&price, &deposit, &forwards),
            calculate_balance(&price, &deposit, &backwards)
        );
    }
}
