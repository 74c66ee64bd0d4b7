//! Prelude
//!
//! Re-exports the types most callers need to price a booking.

pub use crate::{
    balance::{Balance, BalanceError, calculate_balance},
    discounts::{
        DiscountCategory, DiscountError, DiscountSet, EventDiscount, ReviewDiscountPolicy,
        cap::DiscountCap,
    },
    pricing::{PricingError, PricingField, PricingSnapshot},
    referral::{
        PartnerCode, PartnerCodeError, ReferralError, ReferralGrant, ReferralParty, ReferralPolicy,
    },
    status::BookingStatus,
};
