//! Booking to reservation sync.

use tracing::{debug, error};

use crate::{
    database::Db,
    domain::{
        bookings::records::BookingUuid,
        reservations::{records::ReservationRecord, repository::PgReservationsRepository},
    },
};

/// Mirrors committed bookings into the legacy `reservations` table
///
/// Each mirror runs in its own transaction after the booking change has committed and copies
/// the booking row as it is stored at that moment. A failed mirror is logged and left for
/// [`super::ReservationsService::reconcile`] to repair.
#[derive(Debug, Clone)]
pub struct ReservationSync {
    db: Db,
    repository: PgReservationsRepository,
}

impl ReservationSync {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReservationsRepository::new(),
        }
    }

    /// Mirror the stored state of `booking` into its reservation. Errors are logged and swallowed.
    pub async fn mirror(&self, booking: BookingUuid) {
        match self.try_mirror(booking).await {
            Ok(reservation) => {
                debug!(
                    booking_uuid = %booking,
                    reservation_id = reservation.id,
                    status = %reservation.status,
                    "synced legacy reservation"
                );
            }
            Err(error) => {
                error!(
                    booking_uuid = %booking,
                    error = %error,
                    "failed to sync legacy reservation"
                );
            }
        }
    }

    async fn try_mirror(&self, booking: BookingUuid) -> Result<ReservationRecord, sqlx::Error> {
        let mut tx = self.db.begin_transaction().await?;

        let reservation = self.repository.upsert_reservation(&mut tx, booking).await?;

        tx.commit().await?;

        Ok(reservation)
    }
}
