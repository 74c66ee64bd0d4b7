//! Events service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::events::{
        data::NewEvent,
        errors::EventsServiceError,
        records::{EventOffer, EventRecord, EventUuid},
        repository::PgEventsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgEventsService {
    db: Db,
    repository: PgEventsRepository,
}

impl PgEventsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgEventsRepository::new(),
        }
    }
}

#[async_trait]
impl EventsService for PgEventsService {
    #[tracing::instrument(
        name = "events.service.create_event",
        skip(self, event),
        fields(event_uuid = %event.uuid),
        err
    )]
    async fn create_event(&self, event: NewEvent) -> Result<EventRecord, EventsServiceError> {
        if event.name.trim().is_empty() {
            return Err(EventsServiceError::MissingRequiredData);
        }

        if event.ends_on < event.starts_on {
            return Err(EventsServiceError::InvalidPeriod);
        }

        if let EventOffer::PercentageOff { basis_points } = event.offer
            && basis_points > EventOffer::MAX_BASIS_POINTS
        {
            return Err(EventsServiceError::InvalidPercentage(basis_points));
        }

        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.create_event(&mut tx, &event).await?;

        tx.commit().await?;

        info!(event_uuid = %record.uuid, name = %record.name, "created event");

        Ok(record)
    }

    async fn get_event(&self, event: EventUuid) -> Result<EventRecord, EventsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .repository
            .find_event(&mut tx, event)
            .await?
            .ok_or(EventsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_events(&self) -> Result<Vec<EventRecord>, EventsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let events = self.repository.list_events(&mut tx).await?;

        tx.commit().await?;

        Ok(events)
    }
}

#[automock]
#[async_trait]
pub trait EventsService: Send + Sync {
    /// Creates a new event.
    async fn create_event(&self, event: NewEvent) -> Result<EventRecord, EventsServiceError>;

    /// Retrieve a single event.
    async fn get_event(&self, event: EventUuid) -> Result<EventRecord, EventsServiceError>;

    /// Retrieves all events, earliest first.
    async fn list_events(&self) -> Result<Vec<EventRecord>, EventsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn new_event(offer: EventOffer) -> NewEvent {
        NewEvent {
            uuid: EventUuid::new(),
            name: "Autumn fair".to_string(),
            offer,
            starts_on: date(2026, 10, 1),
            ends_on: date(2026, 10, 31),
        }
    }

    #[tokio::test]
    async fn create_event_returns_stored_offer() -> TestResult {
        let ctx = TestContext::new().await;
        let event = new_event(EventOffer::PercentageOff { basis_points: 1_500 });

        let record = ctx.events.create_event(event.clone()).await?;

        assert_eq!(record.uuid, event.uuid);
        assert_eq!(record.offer, EventOffer::PercentageOff { basis_points: 1_500 });
        assert_eq!(record.starts_on, date(2026, 10, 1));
        assert_eq!(record.ends_on, date(2026, 10, 31));

        Ok(())
    }

    #[tokio::test]
    async fn get_event_returns_created_event() -> TestResult {
        let ctx = TestContext::new().await;
        let event = new_event(EventOffer::AmountOff { amount: 100_000 });

        ctx.events.create_event(event.clone()).await?;

        let record = ctx.events.get_event(event.uuid).await?;

        assert_eq!(record.name, "Autumn fair");
        assert_eq!(record.offer, EventOffer::AmountOff { amount: 100_000 });

        Ok(())
    }

    #[tokio::test]
    async fn get_event_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.events.get_event(EventUuid::new()).await;

        assert!(
            matches!(result, Err(EventsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_events_orders_by_start_date() -> TestResult {
        let ctx = TestContext::new().await;

        let later = new_event(EventOffer::AmountOff { amount: 1 });
        let earlier = NewEvent {
            starts_on: date(2026, 9, 1),
            ..new_event(EventOffer::AmountOff { amount: 2 })
        };

        ctx.events.create_event(later.clone()).await?;
        ctx.events.create_event(earlier.clone()).await?;

        let uuids: Vec<EventUuid> = ctx
            .events
            .list_events()
            .await?
            .iter()
            .map(|event| event.uuid)
            .collect();

        assert_eq!(uuids, vec![earlier.uuid, later.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn create_event_rejects_inverted_period() {
        let ctx = TestContext::new().await;
        let event = NewEvent {
            ends_on: date(2026, 9, 30),
            ..new_event(EventOffer::AmountOff { amount: 1 })
        };

        let result = ctx.events.create_event(event).await;

        assert!(
            matches!(result, Err(EventsServiceError::InvalidPeriod)),
            "expected InvalidPeriod, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_event_rejects_percentage_over_100() {
        let ctx = TestContext::new().await;

        let result = ctx
            .events
            .create_event(new_event(EventOffer::PercentageOff {
                basis_points: 10_001,
            }))
            .await;

        assert!(
            matches!(result, Err(EventsServiceError::InvalidPercentage(10_001))),
            "expected InvalidPercentage, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_event_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let event = new_event(EventOffer::AmountOff { amount: 1 });

        ctx.events.create_event(event.clone()).await?;

        let result = ctx.events.create_event(event).await;

        assert!(
            matches!(result, Err(EventsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }
}
