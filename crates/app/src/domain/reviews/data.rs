//! Reviews Data

use crate::domain::{bookings::records::BookingUuid, reviews::records::ReviewUuid};

/// New Review Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub uuid: ReviewUuid,
    pub booking_uuid: BookingUuid,
    pub url: String,
}
