//! Reelbook
//!
//! Pricing rules for wedding film bookings: discount categories, the balance calculator,
//! partner (referral) code validation, the booking lifecycle and the pricing snapshot used to
//! keep legacy reservations consistent with bookings.

pub mod balance;
pub mod discounts;
pub mod pricing;
pub mod referral;
pub mod status;

pub mod prelude;
