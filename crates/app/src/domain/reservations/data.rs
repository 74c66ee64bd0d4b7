//! Reservations Data

use serde::Serialize;

/// Outcome of a reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Bookings compared
    pub checked: u64,

    /// Reservations that already matched their booking
    pub in_sync: u64,

    /// Reservations created for bookings that had none
    pub created: u64,

    /// Reservations rewritten because they had drifted
    pub repaired: u64,
}
