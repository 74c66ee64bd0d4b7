//! Referrals
//!
//! A confirmed booking owns a [`PartnerCode`]. Another customer entering that code on their own
//! booking earns a fixed discount, and the booking that owns the code earns the same amount.

use jiff::civil::Date;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::status::BookingStatus;

pub mod code;

pub use code::{PartnerCode, PartnerCodeError};

/// Reasons a partner code cannot be applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferralError {
    /// No booking owns the code.
    #[error("partner code not found")]
    NotFound,

    /// The code belongs to the referee's own booking or to the same customer.
    #[error("a partner code cannot be applied to its own booking")]
    SelfReferral,

    /// The booking owning the code is not confirmed.
    #[error("partner code belongs to a booking that is not confirmed ({0})")]
    NotConfirmed(BookingStatus),

    /// The wedding of the booking owning the code has already taken place.
    #[error("partner code expired on {0}")]
    Expired(Date),

    /// The referee already used a partner code.
    #[error("a partner code has already been applied to this booking")]
    AlreadyReferred,

    /// The configured referral amount is negative.
    #[error("referral discount cannot be negative")]
    NegativeAmount,
}

/// A booking as seen by the referral validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferralParty<B, C> {
    /// Booking identifier
    pub booking: B,

    /// Customer identifier
    pub customer: C,

    /// Current booking status
    pub status: BookingStatus,

    /// Date of the wedding being filmed
    pub wedding_date: Date,

    /// Booking whose partner code this booking already used, if any
    pub referred_by: Option<B>,
}

impl<B: PartialEq, C: PartialEq> ReferralParty<B, C> {
    /// Whether both parties are the same booking or the same customer.
    pub fn is_same_party(&self, other: &Self) -> bool {
        self.booking == other.booking || self.customer == other.customer
    }
}

/// A successful referral
///
/// The same amount is granted to both the referrer and the referee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferralGrant<'a, B> {
    /// Booking that owns the partner code
    pub referrer: B,

    /// Booking the code was entered on
    pub referee: B,

    /// Amount granted to each party
    pub amount: Money<'a, Currency>,
}

impl<'a, B: PartialEq> ReferralGrant<'a, B> {
    /// Amount this grant gives `booking`, if it is one of the two parties.
    pub fn amount_for(&self, booking: &B) -> Option<Money<'a, Currency>> {
        (*booking == self.referrer || *booking == self.referee).then_some(self.amount)
    }
}

/// Fixed referral discount granted to both parties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferralPolicy<'a> {
    amount: Money<'a, Currency>,
}

impl<'a> ReferralPolicy<'a> {
    /// Create a referral policy granting `amount` to each party.
    pub const fn new(amount: Money<'a, Currency>) -> Self {
        Self { amount }
    }

    /// Amount granted to each party.
    pub const fn amount(&self) -> &Money<'a, Currency> {
        &self.amount
    }

    /// Validate a referral and produce the grant for both parties.
    ///
    /// `referrer` is the booking the code was looked up against, `None` when the code is unknown.
    /// Self-referral is checked before the state of either booking, so it is rejected no matter
    /// what state the bookings are in.
    ///
    /// # Errors
    ///
    /// Returns a [`ReferralError`] describing the first failed condition.
    pub fn validate<B, C>(
        &self,
        referee: &ReferralParty<B, C>,
        referrer: Option<&ReferralParty<B, C>>,
        today: Date,
    ) -> Result<ReferralGrant<'a, B>, ReferralError>
    where
        B: PartialEq + Copy,
        C: PartialEq,
    {
        let referrer = referrer.ok_or(ReferralError::NotFound)?;

        if referee.is_same_party(referrer) {
            return Err(ReferralError::SelfReferral);
        }

        if referee.referred_by.is_some() {
            return Err(ReferralError::AlreadyReferred);
        }

        if referrer.status != BookingStatus::Confirmed {
            return Err(ReferralError::NotConfirmed(referrer.status));
        }

        if referrer.wedding_date < today {
            return Err(ReferralError::Expired(referrer.wedding_date));
        }

        if self.amount.is_negative() {
            return Err(ReferralError::NegativeAmount);
        }

        Ok(ReferralGrant {
            referrer: referrer.booking,
            referee: referee.booking,
            amount: self.amount,
        })
    }
}
