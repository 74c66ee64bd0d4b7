//! Events Data

use jiff::civil::Date;

use crate::domain::events::records::{EventOffer, EventUuid};

/// New Event Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub uuid: EventUuid,
    pub name: String,
    pub offer: EventOffer,
    pub starts_on: Date,
    pub ends_on: Date,
}
