//! Legacy Reservations
//!
//! The `reservations` table predates bookings and is still read by older back office screens.
//! Every committed booking change is mirrored into it by [`ReservationSync`].

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;
pub mod sync;

pub use errors::ReservationsServiceError;
pub use service::*;
pub use sync::ReservationSync;
