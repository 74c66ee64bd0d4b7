//! Bookings service errors.

use std::num::TryFromIntError;

use jiff::civil::Date;
use reelbook::{
    referral::{PartnerCodeError, ReferralError},
    status::BookingStatus,
};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::pricing::PricingRuleError;

#[derive(Debug, Error)]
pub enum BookingsServiceError {
    #[error("booking already exists")]
    AlreadyExists,

    #[error("booking not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("invalid amount")]
    InvalidAmount(#[from] TryFromIntError),

    #[error("booking is {0} and its pricing can no longer change")]
    Locked(BookingStatus),

    #[error("booking cannot move from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("event not found")]
    EventNotFound,

    #[error("event is not running on {0}")]
    EventInactive(Date),

    #[error("could not allocate a unique partner code")]
    PartnerCodeExhausted,

    #[error(transparent)]
    PartnerCode(#[from] PartnerCodeError),

    #[error(transparent)]
    Referral(#[from] ReferralError),

    #[error(transparent)]
    Pricing(#[from] PricingRuleError),
}

impl From<Error> for BookingsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
