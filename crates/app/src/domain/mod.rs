//! Application domains.

pub mod bookings;
pub mod events;
pub mod pricing;
pub mod reservations;
pub mod reviews;
