//! Booking Records

use jiff::{Timestamp, civil::Date};
use reelbook::{
    pricing::PricingSnapshot,
    referral::{PartnerCode, ReferralParty},
    status::BookingStatus,
};
use serde::Serialize;

use crate::{domain::events::records::EventUuid, uuids::TypedUuid};

/// Booking UUID
pub type BookingUuid = TypedUuid<BookingRecord>;

/// Customer Record
///
/// Customers are owned by the identity service; bookings only carry their UUID.
pub struct CustomerRecord;

/// Customer UUID
pub type CustomerUuid = TypedUuid<CustomerRecord>;

/// Booking Record
#[derive(Debug, Clone, Serialize)]
pub struct BookingRecord {
    pub uuid: BookingUuid,
    pub customer_uuid: CustomerUuid,
    pub customer_name: String,
    pub wedding_date: Date,
    pub status: BookingStatus,
    pub pricing: PricingSnapshot,
    pub event_uuid: Option<EventUuid>,
    pub partner_code: Option<PartnerCode>,
    pub referred_by: Option<BookingUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BookingRecord {
    /// This booking as seen by the referral validator.
    pub fn referral_party(&self) -> ReferralParty<BookingUuid, CustomerUuid> {
        ReferralParty {
            booking: self.uuid,
            customer: self.customer_uuid,
            status: self.status,
            wedding_date: self.wedding_date,
            referred_by: self.referred_by,
        }
    }
}
