//! Booking Lifecycle

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

/// Error returned when parsing an unknown status string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown booking status: {0}")]
pub struct UnknownStatus(pub String);

/// Booking status
///
/// ```text
/// PENDING ──► CONFIRMED ──► DELIVERED
///    │            │
///    └────────────┴──────► CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Submitted by the customer, awaiting confirmation.
    Pending,

    /// Confirmed by the studio; the booking now owns a partner code.
    Confirmed,

    /// Film delivered. Terminal.
    Delivered,

    /// Cancelled by either party. Terminal.
    Cancelled,
}

impl BookingStatus {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Status written to the legacy reservation record.
    #[must_use]
    pub const fn reservation_status(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Delivered => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Delivered and cancelled bookings can no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether discount or price fields may still be edited.
    #[must_use]
    pub const fn accepts_pricing_changes(self) -> bool {
        !self.is_terminal()
    }

    /// Whether moving from `self` to `next` is a valid lifecycle step.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Delivered)
                | (Self::Pending | Self::Confirmed, Self::Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
