//! Bookings Data

use jiff::civil::Date;
use serde::Serialize;

use crate::domain::bookings::records::{BookingRecord, BookingUuid, CustomerUuid};

/// New Booking Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub uuid: BookingUuid,
    pub customer_uuid: CustomerUuid,
    pub customer_name: String,
    pub wedding_date: Date,
    pub list_price: u64,
    pub deposit: u64,
}

/// Quote Update Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteUpdate {
    pub list_price: u64,
    pub deposit: u64,
}

/// Both bookings after a partner code was applied
#[derive(Debug, Clone, Serialize)]
pub struct AppliedReferral {
    /// Booking the code was entered on
    pub referee: BookingRecord,

    /// Booking that owns the code
    pub referrer: BookingRecord,

    /// Discount granted to each booking
    pub amount: u64,
}
