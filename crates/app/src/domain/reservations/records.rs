//! Reservation Records

use jiff::Timestamp;
use reelbook::pricing::PricingSnapshot;
use serde::Serialize;

use crate::domain::bookings::records::BookingUuid;

/// Reservation Record
///
/// `pricing.list_price` is stored as `total_price`, `pricing.deposit` as `deposit_amount` and
/// `pricing.special_discount` as `new_year_discount`.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationRecord {
    pub id: i64,
    pub booking_uuid: BookingUuid,
    pub status: String,
    pub pricing: PricingSnapshot,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
