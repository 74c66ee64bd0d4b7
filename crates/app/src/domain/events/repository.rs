//! Events Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{amount_param, try_get_amount},
    domain::events::{
        data::NewEvent,
        records::{EventOffer, EventRecord, EventUuid},
    },
};

const CREATE_EVENT_SQL: &str = include_str!("sql/create_event.sql");
const FIND_EVENT_SQL: &str = include_str!("sql/find_event.sql");
const LIST_EVENTS_SQL: &str = include_str!("sql/list_events.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgEventsRepository;

impl PgEventsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: &NewEvent,
    ) -> Result<EventRecord, sqlx::Error> {
        query_as::<Postgres, EventRecord>(CREATE_EVENT_SQL)
            .bind(event.uuid.into_uuid())
            .bind(&event.name)
            .bind(event.offer.kind())
            .bind(amount_param(event.offer.value(), "discount_value")?)
            .bind(SqlxDate::from(event.starts_on))
            .bind(SqlxDate::from(event.ends_on))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: EventUuid,
    ) -> Result<Option<EventRecord>, sqlx::Error> {
        query_as::<Postgres, EventRecord>(FIND_EVENT_SQL)
            .bind(event.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_events(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<EventRecord>, sqlx::Error> {
        query_as::<Postgres, EventRecord>(LIST_EVENTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for EventRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("discount_kind")?;
        let value = try_get_amount(row, "discount_value")?;

        let offer =
            EventOffer::from_columns(&kind, value).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "discount_kind".to_string(),
                source: format!("unknown discount kind {kind:?} with value {value}").into(),
            })?;

        Ok(Self {
            uuid: EventUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            offer,
            starts_on: row.try_get::<SqlxDate, _>("starts_on")?.to_jiff(),
            ends_on: row.try_get::<SqlxDate, _>("ends_on")?.to_jiff(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
