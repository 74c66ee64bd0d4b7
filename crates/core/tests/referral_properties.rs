//! Property-based tests for partner code referrals.

use jiff::civil::{Date, date};
use proptest::prelude::*;
use rusty_money::{Money, iso::KRW};

use reelbook::{
    referral::{ReferralError, ReferralParty, ReferralPolicy},
    status::BookingStatus,
};

const TODAY: Date = date(2026, 10, 17);

fn status() -> impl Strategy<Value = BookingStatus> {
    prop::sample::select(vec![
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Delivered,
        BookingStatus::Cancelled,
    ])
}

fn wedding_date() -> impl Strategy<Value = Date> {
    (-400_i32..400).prop_map(|offset| {
        TODAY
            .checked_add(jiff::Span::new().days(i64::from(offset)))
            .unwrap_or(TODAY)
    })
}

fn party() -> impl Strategy<Value = ReferralParty<u8, u8>> {
    (
        any::<u8>(),
        any::<u8>(),
        status(),
        wedding_date(),
        proptest::option::of(any::<u8>()),
    )
        .prop_map(
            |(booking, customer, status, wedding_date, referred_by)| ReferralParty {
                booking,
                customer,
                status,
                wedding_date,
                referred_by,
            },
        )
}

proptest! {
    #[test]
    fn self_referral_is_always_rejected(own in party(), amount in 0_i64..1_000_000) {
        let policy = ReferralPolicy::new(Money::from_minor(amount, KRW));

        prop_assert_eq!(
            policy.validate(&own, Some(&own), TODAY),
            Err(ReferralError::SelfReferral)
        );
    }

    #[test]
    fn same_customer_is_always_rejected(
        referee in party(),
        referrer in party(),
    ) {
        let policy = ReferralPolicy::new(Money::from_minor(50_000, KRW));
        let referrer = ReferralParty { customer: referee.customer, ..referrer };

        prop_assert_eq!(
            policy.validate(&referee, Some(&referrer), TODAY),
            Err(ReferralError::SelfReferral)
        );
    }

    #[test]
    fn successful_grants_are_symmetric(
        referee in party(),
        referrer in party(),
        amount in 0_i64..1_000_000,
    ) {
        let policy = ReferralPolicy::new(Money::from_minor(amount, KRW));

        if let Ok(grant) = policy.validate(&referee, Some(&referrer), TODAY) {
            prop_assert_eq!(grant.amount_for(&referee.booking), Some(Money::from_minor(amount, KRW)));
            prop_assert_eq!(grant.amount_for(&referrer.booking), grant.amount_for(&referee.booking));
            prop_assert_eq!(referrer.status, BookingStatus::Confirmed);
            prop_assert!(referrer.wedding_date >= TODAY);
        }
    }
}
