//! Reservations service.

use std::collections::HashMap;

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        bookings::{records::BookingUuid, repository::PgBookingsRepository},
        reservations::{
            data::ReconcileReport, errors::ReservationsServiceError,
            records::ReservationRecord, repository::PgReservationsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgReservationsService {
    db: Db,
    reservations: PgReservationsRepository,
    bookings: PgBookingsRepository,
}

impl PgReservationsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            reservations: PgReservationsRepository::new(),
            bookings: PgBookingsRepository::new(),
        }
    }
}

#[async_trait]
impl ReservationsService for PgReservationsService {
    async fn get_reservation(
        &self,
        booking: BookingUuid,
    ) -> Result<ReservationRecord, ReservationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let reservation = self.reservations.get_reservation(&mut tx, booking).await?;

        tx.commit().await?;

        Ok(reservation)
    }

    #[tracing::instrument(name = "reservations.service.reconcile", skip(self), err)]
    async fn reconcile(&self) -> Result<ReconcileReport, ReservationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let bookings = self.bookings.list_bookings(&mut tx).await?;

        let mut reservations: HashMap<BookingUuid, ReservationRecord> = self
            .reservations
            .list_reservations(&mut tx)
            .await?
            .into_iter()
            .map(|reservation| (reservation.booking_uuid, reservation))
            .collect();

        let mut report = ReconcileReport::default();

        for booking in &bookings {
            report.checked += 1;

            let Some(reservation) = reservations.remove(&booking.uuid) else {
                self.reservations
                    .upsert_reservation(&mut tx, booking.uuid)
                    .await?;

                warn!(booking_uuid = %booking.uuid, "created missing legacy reservation");

                report.created += 1;

                continue;
            };

            let mut drifted: Vec<String> = reservation
                .pricing
                .drift(&booking.pricing)
                .iter()
                .map(ToString::to_string)
                .collect();

            if reservation.status != booking.status.reservation_status() {
                drifted.push("status".to_string());
            }

            if drifted.is_empty() {
                report.in_sync += 1;

                continue;
            }

            let repaired = self
                .reservations
                .upsert_reservation(&mut tx, booking.uuid)
                .await?;

            warn!(
                booking_uuid = %booking.uuid,
                reservation_id = repaired.id,
                fields = %drifted.join(","),
                "repaired drifted legacy reservation"
            );

            report.repaired += 1;
        }

        tx.commit().await?;

        info!(
            checked = report.checked,
            in_sync = report.in_sync,
            created = report.created,
            repaired = report.repaired,
            "reconciled legacy reservations"
        );

        Ok(report)
    }
}

#[automock]
#[async_trait]
pub trait ReservationsService: Send + Sync {
    /// Retrieve the legacy reservation mirroring a booking.
    async fn get_reservation(
        &self,
        booking: BookingUuid,
    ) -> Result<ReservationRecord, ReservationsServiceError>;

    /// Compare every booking with its reservation and rewrite those that are missing or drifted.
    async fn reconcile(&self) -> Result<ReconcileReport, ReservationsServiceError>;
}

#[cfg(test)]
mod tests {
    use reelbook::status::BookingStatus;
    use sqlx::query;
    use testresult::TestResult;

    use crate::{
        domain::bookings::BookingsService,
        test::{TestContext, helpers::create_booking},
    };

    use super::*;

    #[tokio::test]
    async fn created_booking_is_mirrored() -> TestResult {
        let ctx = TestContext::new().await;
        let booking = create_booking(&ctx, 2_000_000, 300_000).await?;

        let reservation = ctx.reservations.get_reservation(booking.uuid).await?;

        assert_eq!(reservation.booking_uuid, booking.uuid);
        assert_eq!(reservation.status, "PENDING");
        assert_eq!(reservation.pricing, booking.pricing);
        assert_eq!(reservation.pricing.final_balance, 1_700_000);

        Ok(())
    }

    #[tokio::test]
    async fn delivered_booking_is_mirrored_as_completed() -> TestResult {
        let ctx = TestContext::new().await;
        let booking = create_booking(&ctx, 2_000_000, 0).await?;

        ctx.bookings.confirm_booking(booking.uuid).await?;
        let delivered = ctx.bookings.deliver_booking(booking.uuid).await?;

        assert_eq!(delivered.status, BookingStatus::Delivered);

        let reservation = ctx.reservations.get_reservation(booking.uuid).await?;

        assert_eq!(reservation.status, "COMPLETED");

        Ok(())
    }

    #[tokio::test]
    async fn get_reservation_unknown_booking_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.reservations.get_reservation(BookingUuid::new()).await;

        assert!(
            matches!(result, Err(ReservationsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn reconcile_reports_in_sync_reservations() -> TestResult {
        let ctx = TestContext::new().await;

        create_booking(&ctx, 1_000_000, 0).await?;
        create_booking(&ctx, 1_500_000, 0).await?;

        let report = ctx.reservations.reconcile().await?;

        assert_eq!(
            report,
            ReconcileReport {
                checked: 2,
                in_sync: 2,
                created: 0,
                repaired: 0,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn reconcile_repairs_drifted_reservation() -> TestResult {
        let ctx = TestContext::new().await;
        let booking = create_booking(&ctx, 1_000_000, 100_000).await?;

        query("UPDATE reservations SET final_balance = 1, status = 'CANCELLED' WHERE booking_uuid = $1")
            .bind(booking.uuid.into_uuid())
            .execute(ctx.db.pool())
            .await?;

        let report = ctx.reservations.reconcile().await?;

        assert_eq!(report.repaired, 1);
        assert_eq!(report.in_sync, 0);

        let reservation = ctx.reservations.get_reservation(booking.uuid).await?;

        assert_eq!(reservation.pricing.final_balance, 900_000);
        assert_eq!(reservation.status, "PENDING");

        Ok(())
    }

    #[tokio::test]
    async fn reconcile_creates_missing_reservation() -> TestResult {
        let ctx = TestContext::new().await;
        let booking = create_booking(&ctx, 1_000_000, 0).await?;

        query("DELETE FROM reservations WHERE booking_uuid = $1")
            .bind(booking.uuid.into_uuid())
            .execute(ctx.db.pool())
            .await?;

        let report = ctx.reservations.reconcile().await?;

        assert_eq!(report.created, 1);

        let reservation = ctx.reservations.get_reservation(booking.uuid).await?;

        assert_eq!(reservation.pricing, booking.pricing);

        Ok(())
    }
}
