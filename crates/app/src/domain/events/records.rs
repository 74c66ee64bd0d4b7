//! Event Records

use jiff::{Timestamp, civil::Date};
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Event UUID
pub type EventUuid = TypedUuid<EventRecord>;

/// Discount offered while an event runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventOffer {
    /// Percentage of the list price, in basis points (`1_000` is 10%)
    PercentageOff { basis_points: u32 },

    /// Fixed amount off, in minor units
    AmountOff { amount: u64 },
}

impl EventOffer {
    /// Largest percentage offer, 100%.
    pub const MAX_BASIS_POINTS: u32 = 10_000;

    pub(crate) const fn kind(self) -> &'static str {
        match self {
            Self::PercentageOff { .. } => "PERCENTAGE",
            Self::AmountOff { .. } => "AMOUNT",
        }
    }

    pub(crate) fn value(self) -> u64 {
        match self {
            Self::PercentageOff { basis_points } => u64::from(basis_points),
            Self::AmountOff { amount } => amount,
        }
    }

    pub(crate) fn from_columns(kind: &str, value: u64) -> Option<Self> {
        match kind {
            "PERCENTAGE" => u32::try_from(value)
                .ok()
                .map(|basis_points| Self::PercentageOff { basis_points }),
            "AMOUNT" => Some(Self::AmountOff { amount: value }),
            _ => None,
        }
    }
}

/// Event Record
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub uuid: EventUuid,
    pub name: String,
    pub offer: EventOffer,
    pub starts_on: Date,
    pub ends_on: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EventRecord {
    /// Whether the event runs on `date`. Both ends of the period are inclusive.
    pub fn is_active_on(&self, date: Date) -> bool {
        self.starts_on <= date && date <= self.ends_on
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn spring_fair() -> EventRecord {
        EventRecord {
            uuid: EventUuid::new(),
            name: "Spring fair".to_string(),
            offer: EventOffer::PercentageOff { basis_points: 1_000 },
            starts_on: date(2026, 3, 1),
            ends_on: date(2026, 3, 31),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn event_is_active_on_both_boundaries() {
        let event = spring_fair();

        assert!(event.is_active_on(date(2026, 3, 1)));
        assert!(event.is_active_on(date(2026, 3, 31)));
        assert!(!event.is_active_on(date(2026, 2, 28)));
        assert!(!event.is_active_on(date(2026, 4, 1)));
    }

    #[test]
    fn offer_columns_round_trip() {
        for offer in [
            EventOffer::PercentageOff { basis_points: 2_500 },
            EventOffer::AmountOff { amount: 100_000 },
        ] {
            assert_eq!(
                EventOffer::from_columns(offer.kind(), offer.value()),
                Some(offer)
            );
        }
    }

    #[test]
    fn unknown_offer_kind_is_rejected() {
        assert_eq!(EventOffer::from_columns("BOGO", 1), None);
    }
}
