//! Bookings Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use reelbook::{pricing::PricingSnapshot, referral::PartnerCode, status::BookingStatus};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{amount_param, try_get_amount},
    domain::{
        bookings::{
            data::NewBooking,
            records::{BookingRecord, BookingUuid, CustomerUuid},
        },
        events::records::EventUuid,
    },
};

const CREATE_BOOKING_SQL: &str = include_str!("sql/create_booking.sql");
const FIND_BOOKING_SQL: &str = include_str!("sql/find_booking.sql");
const LOCK_BOOKING_SQL: &str = include_str!("sql/lock_booking.sql");
const FIND_BOOKING_BY_PARTNER_CODE_SQL: &str = include_str!("sql/find_booking_by_partner_code.sql");
const LIST_BOOKINGS_SQL: &str = include_str!("sql/list_bookings.sql");
const PARTNER_CODE_EXISTS_SQL: &str = include_str!("sql/partner_code_exists.sql");
const UPDATE_PRICING_SQL: &str = include_str!("sql/update_pricing.sql");
const UPDATE_STATUS_SQL: &str = include_str!("sql/update_status.sql");
const SET_REFERRER_SQL: &str = include_str!("sql/set_referrer.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBookingsRepository;

impl PgBookingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: &NewBooking,
        final_balance: u64,
    ) -> Result<BookingRecord, sqlx::Error> {
        query_as::<Postgres, BookingRecord>(CREATE_BOOKING_SQL)
            .bind(booking.uuid.into_uuid())
            .bind(booking.customer_uuid.into_uuid())
            .bind(&booking.customer_name)
            .bind(SqlxDate::from(booking.wedding_date))
            .bind(amount_param(booking.list_price, "list_price")?)
            .bind(amount_param(booking.deposit, "deposit")?)
            .bind(amount_param(final_balance, "final_balance")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<BookingRecord, sqlx::Error> {
        query_as::<Postgres, BookingRecord>(FIND_BOOKING_SQL)
            .bind(booking.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch a booking and hold a row lock on it until the transaction ends.
    pub(crate) async fn lock_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<BookingRecord, sqlx::Error> {
        query_as::<Postgres, BookingRecord>(LOCK_BOOKING_SQL)
            .bind(booking.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// UUID of the booking owning `code`. Partner codes never change once assigned, so the
    /// lookup needs no lock.
    pub(crate) async fn find_booking_by_partner_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &PartnerCode,
    ) -> Result<Option<BookingUuid>, sqlx::Error> {
        let uuid = query_scalar::<Postgres, Uuid>(FIND_BOOKING_BY_PARTNER_CODE_SQL)
            .bind(code.as_str())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(uuid.map(BookingUuid::from_uuid))
    }

    pub(crate) async fn list_bookings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<BookingRecord>, sqlx::Error> {
        query_as::<Postgres, BookingRecord>(LIST_BOOKINGS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn partner_code_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &PartnerCode,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(PARTNER_CODE_EXISTS_SQL)
            .bind(code.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_pricing(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
        event: Option<EventUuid>,
        pricing: &PricingSnapshot,
    ) -> Result<BookingRecord, sqlx::Error> {
        query_as::<Postgres, BookingRecord>(UPDATE_PRICING_SQL)
            .bind(booking.into_uuid())
            .bind(amount_param(pricing.list_price, "list_price")?)
            .bind(amount_param(pricing.deposit, "deposit")?)
            .bind(event.map(EventUuid::into_uuid))
            .bind(amount_param(pricing.event_discount, "event_discount")?)
            .bind(amount_param(pricing.referral_discount, "referral_discount")?)
            .bind(amount_param(pricing.review_discount, "review_discount")?)
            .bind(amount_param(pricing.special_discount, "special_discount")?)
            .bind(amount_param(pricing.final_balance, "final_balance")?)
            .fetch_one(&mut **tx)
            .await
    }

    /// Set the status, and the partner code when one is given. An existing code is never cleared.
    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
        status: BookingStatus,
        partner_code: Option<&PartnerCode>,
    ) -> Result<BookingRecord, sqlx::Error> {
        query_as::<Postgres, BookingRecord>(UPDATE_STATUS_SQL)
            .bind(booking.into_uuid())
            .bind(status.as_str())
            .bind(partner_code.map(PartnerCode::as_str))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_referrer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        referee: BookingUuid,
        referrer: BookingUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_REFERRER_SQL)
            .bind(referee.into_uuid())
            .bind(referrer.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for BookingRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = status
            .parse::<BookingStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        let partner_code = row
            .try_get::<Option<String>, _>("partner_code")?
            .map(|code| PartnerCode::parse(&code))
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "partner_code".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: BookingUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            customer_name: row.try_get("customer_name")?,
            wedding_date: row.try_get::<SqlxDate, _>("wedding_date")?.to_jiff(),
            status,
            pricing: PricingSnapshot {
                list_price: try_get_amount(row, "list_price")?,
                deposit: try_get_amount(row, "deposit")?,
                event_discount: try_get_amount(row, "event_discount")?,
                referral_discount: try_get_amount(row, "referral_discount")?,
                review_discount: try_get_amount(row, "review_discount")?,
                special_discount: try_get_amount(row, "special_discount")?,
                final_balance: try_get_amount(row, "final_balance")?,
            },
            event_uuid: row
                .try_get::<Option<Uuid>, _>("event_uuid")?
                .map(EventUuid::from_uuid),
            partner_code,
            referred_by: row
                .try_get::<Option<Uuid>, _>("referred_by_uuid")?
                .map(BookingUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
