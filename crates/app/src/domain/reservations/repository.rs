//! Reservations Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use reelbook::pricing::PricingSnapshot;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::try_get_amount,
    domain::{
        bookings::records::BookingUuid,
        reservations::records::ReservationRecord,
    },
};

const FIND_RESERVATION_SQL: &str = include_str!("sql/find_reservation.sql");
const LIST_RESERVATIONS_SQL: &str = include_str!("sql/list_reservations.sql");
const UPSERT_RESERVATION_SQL: &str = include_str!("sql/upsert_reservation.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReservationsRepository;

impl PgReservationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<ReservationRecord, sqlx::Error> {
        query_as::<Postgres, ReservationRecord>(FIND_RESERVATION_SQL)
            .bind(booking.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_reservations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ReservationRecord>, sqlx::Error> {
        query_as::<Postgres, ReservationRecord>(LIST_RESERVATIONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Copy the booking's stored status and pricing columns into its reservation, creating it if
    /// needed.
    ///
    /// The booking row is locked and read inside the statement, so concurrent mirrors of the same
    /// booking run one after another and each writes the latest committed state. Fails with
    /// [`sqlx::Error::RowNotFound`] when the booking does not exist.
    pub(crate) async fn upsert_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<ReservationRecord, sqlx::Error> {
        query_as::<Postgres, ReservationRecord>(UPSERT_RESERVATION_SQL)
            .bind(booking.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ReservationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            booking_uuid: BookingUuid::from_uuid(row.try_get("booking_uuid")?),
            status: row.try_get("status")?,
            pricing: PricingSnapshot {
                list_price: try_get_amount(row, "total_price")?,
                deposit: try_get_amount(row, "deposit_amount")?,
                event_discount: try_get_amount(row, "event_discount")?,
                referral_discount: try_get_amount(row, "referral_discount")?,
                review_discount: try_get_amount(row, "review_discount")?,
                special_discount: try_get_amount(row, "new_year_discount")?,
                final_balance: try_get_amount(row, "final_balance")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
