//! Bookings service.

use async_trait::async_trait;
use jiff::civil::Date;
use mockall::automock;
use reelbook::{
    discounts::DiscountCategory,
    pricing::PricingSnapshot,
    referral::{PartnerCode, ReferralError},
    status::BookingStatus,
};
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        bookings::{
            data::{AppliedReferral, NewBooking, QuoteUpdate},
            errors::BookingsServiceError,
            records::{BookingRecord, BookingUuid},
            repository::PgBookingsRepository,
        },
        events::{records::EventUuid, repository::PgEventsRepository},
        pricing::PricingPolicy,
        reservations::ReservationSync,
    },
};

/// Random draws tried before giving up on a unique partner code.
const PARTNER_CODE_ATTEMPTS: usize = 8;

#[derive(Debug, Clone)]
pub struct PgBookingsService {
    db: Db,
    bookings: PgBookingsRepository,
    events: PgEventsRepository,
    pricing: PricingPolicy,
    sync: ReservationSync,
}

impl PgBookingsService {
    #[must_use]
    pub fn new(db: Db, pricing: PricingPolicy) -> Self {
        Self {
            sync: ReservationSync::new(db.clone()),
            db,
            bookings: PgBookingsRepository::new(),
            events: PgEventsRepository::new(),
            pricing,
        }
    }

    fn ensure_unlocked(booking: &BookingRecord) -> Result<(), BookingsServiceError> {
        if booking.status.accepts_pricing_changes() {
            Ok(())
        } else {
            Err(BookingsServiceError::Locked(booking.status))
        }
    }

    /// Reprice `pricing` and persist it together with the assigned event.
    async fn save_pricing(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
        event: Option<EventUuid>,
        pricing: PricingSnapshot,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let pricing = self.pricing.reprice(pricing)?;

        Ok(self
            .bookings
            .update_pricing(tx, booking, event, &pricing)
            .await?)
    }

    async fn allocate_partner_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<PartnerCode, BookingsServiceError> {
        for _ in 0..PARTNER_CODE_ATTEMPTS {
            let code = PartnerCode::generate(&mut rand::thread_rng());

            if !self.bookings.partner_code_exists(tx, &code).await? {
                return Ok(code);
            }
        }

        Err(BookingsServiceError::PartnerCodeExhausted)
    }

    /// Lock the referee and the referrer in ascending UUID order, so two bookings applying each
    /// other's codes at once queue on the same row instead of deadlocking.
    async fn lock_referral_pair(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        referee: BookingUuid,
        referrer: Option<BookingUuid>,
    ) -> Result<(BookingRecord, Option<BookingRecord>), BookingsServiceError> {
        let Some(referrer) = referrer else {
            return Ok((self.bookings.lock_booking(tx, referee).await?, None));
        };

        if referrer == referee {
            let booking = self.bookings.lock_booking(tx, referee).await?;

            return Ok((booking.clone(), Some(booking)));
        }

        let (first, second) = if referee < referrer {
            (referee, referrer)
        } else {
            (referrer, referee)
        };

        let first = self.bookings.lock_booking(tx, first).await?;
        let second = self.bookings.lock_booking(tx, second).await?;

        if first.uuid == referee {
            Ok((first, Some(second)))
        } else {
            Ok((second, Some(first)))
        }
    }

    async fn transition(
        &self,
        booking: BookingUuid,
        next: BookingStatus,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.bookings.lock_booking(&mut tx, booking).await?;

        if !current.status.can_transition_to(next) {
            return Err(BookingsServiceError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }

        let partner_code = if next == BookingStatus::Confirmed && current.partner_code.is_none() {
            Some(self.allocate_partner_code(&mut tx).await?)
        } else {
            None
        };

        let updated = self
            .bookings
            .update_status(&mut tx, booking, next, partner_code.as_ref())
            .await?;

        tx.commit().await?;

        info!(
            booking_uuid = %booking,
            from = %current.status,
            to = %next,
            "changed booking status"
        );

        self.sync.mirror(updated.uuid).await;

        Ok(updated)
    }
}

#[async_trait]
impl BookingsService for PgBookingsService {
    #[tracing::instrument(
        name = "bookings.service.create_booking",
        skip(self, booking),
        fields(booking_uuid = %booking.uuid),
        err
    )]
    async fn create_booking(
        &self,
        booking: NewBooking,
    ) -> Result<BookingRecord, BookingsServiceError> {
        if booking.customer_name.trim().is_empty() {
            return Err(BookingsServiceError::MissingRequiredData);
        }

        let pricing = self.pricing.reprice(PricingSnapshot {
            list_price: booking.list_price,
            deposit: booking.deposit,
            ..PricingSnapshot::default()
        })?;

        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .bookings
            .create_booking(&mut tx, &booking, pricing.final_balance)
            .await?;

        tx.commit().await?;

        info!(
            booking_uuid = %record.uuid,
            final_balance = record.pricing.final_balance,
            "created booking"
        );

        self.sync.mirror(record.uuid).await;

        Ok(record)
    }

    async fn get_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.bookings.get_booking(&mut tx, booking).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_bookings(&self) -> Result<Vec<BookingRecord>, BookingsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let bookings = self.bookings.list_bookings(&mut tx).await?;

        tx.commit().await?;

        Ok(bookings)
    }

    #[tracing::instrument(
        name = "bookings.service.update_quote",
        skip(self),
        fields(booking_uuid = %booking),
        err
    )]
    async fn update_quote(
        &self,
        booking: BookingUuid,
        quote: QuoteUpdate,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.bookings.lock_booking(&mut tx, booking).await?;

        Self::ensure_unlocked(&current)?;

        let mut pricing = PricingSnapshot {
            list_price: quote.list_price,
            deposit: quote.deposit,
            ..current.pricing
        };

        if let Some(event) = current.event_uuid {
            let event = self
                .events
                .find_event(&mut tx, event)
                .await?
                .ok_or(BookingsServiceError::EventNotFound)?;

            pricing.event_discount = self.pricing.event_discount(event.offer, quote.list_price)?;
        }

        let updated = self
            .save_pricing(&mut tx, booking, current.event_uuid, pricing)
            .await?;

        tx.commit().await?;

        info!(
            booking_uuid = %booking,
            final_balance = updated.pricing.final_balance,
            "updated booking quote"
        );

        self.sync.mirror(updated.uuid).await;

        Ok(updated)
    }

    async fn confirm_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError> {
        self.transition(booking, BookingStatus::Confirmed).await
    }

    async fn deliver_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError> {
        self.transition(booking, BookingStatus::Delivered).await
    }

    async fn cancel_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError> {
        self.transition(booking, BookingStatus::Cancelled).await
    }

    #[tracing::instrument(
        name = "bookings.service.assign_event",
        skip(self),
        fields(booking_uuid = %booking),
        err
    )]
    async fn assign_event(
        &self,
        booking: BookingUuid,
        event: Option<EventUuid>,
        today: Date,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.bookings.lock_booking(&mut tx, booking).await?;

        Self::ensure_unlocked(&current)?;

        let discount = match event {
            Some(event) => {
                let event = self
                    .events
                    .find_event(&mut tx, event)
                    .await?
                    .ok_or(BookingsServiceError::EventNotFound)?;

                if !event.is_active_on(today) {
                    return Err(BookingsServiceError::EventInactive(today));
                }

                self.pricing
                    .event_discount(event.offer, current.pricing.list_price)?
            }
            None => 0,
        };

        let mut pricing = current.pricing;
        pricing.set_discount(DiscountCategory::Event, discount);

        let updated = self.save_pricing(&mut tx, booking, event, pricing).await?;

        tx.commit().await?;

        info!(
            booking_uuid = %booking,
            event_discount = discount,
            final_balance = updated.pricing.final_balance,
            "assigned booking event"
        );

        self.sync.mirror(updated.uuid).await;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "bookings.service.apply_partner_code",
        skip(self, code),
        fields(booking_uuid = %booking, partner_code = %code),
        err
    )]
    async fn apply_partner_code(
        &self,
        booking: BookingUuid,
        code: PartnerCode,
        today: Date,
    ) -> Result<AppliedReferral, BookingsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let referrer = self
            .bookings
            .find_booking_by_partner_code(&mut tx, &code)
            .await?;

        let (referee, referrer) = self.lock_referral_pair(&mut tx, booking, referrer).await?;

        let referrer_party = referrer.as_ref().map(BookingRecord::referral_party);

        let grant = self.pricing.referral().validate(
            &referee.referral_party(),
            referrer_party.as_ref(),
            today,
        )?;

        let referrer = referrer.ok_or(ReferralError::NotFound)?;

        Self::ensure_unlocked(&referee)?;

        let amount = u64::try_from(grant.amount.to_minor_units())?;

        self.bookings
            .set_referrer(&mut tx, referee.uuid, referrer.uuid)
            .await?;

        let mut referee_pricing = referee.pricing;
        referee_pricing.set_discount(DiscountCategory::Referral, amount);

        let mut referrer_pricing = referrer.pricing;
        referrer_pricing.set_discount(DiscountCategory::Referral, amount);

        let referee = self
            .save_pricing(&mut tx, referee.uuid, referee.event_uuid, referee_pricing)
            .await?;
        let referrer = self
            .save_pricing(&mut tx, referrer.uuid, referrer.event_uuid, referrer_pricing)
            .await?;

        tx.commit().await?;

        info!(
            referee_uuid = %referee.uuid,
            referrer_uuid = %referrer.uuid,
            amount,
            "applied partner code"
        );

        self.sync.mirror(referee.uuid).await;
        self.sync.mirror(referrer.uuid).await;

        Ok(AppliedReferral {
            referee,
            referrer,
            amount,
        })
    }

    #[tracing::instrument(
        name = "bookings.service.update_special_discount",
        skip(self),
        fields(booking_uuid = %booking),
        err
    )]
    async fn update_special_discount(
        &self,
        booking: BookingUuid,
        amount: u64,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.bookings.lock_booking(&mut tx, booking).await?;

        Self::ensure_unlocked(&current)?;

        let mut pricing = current.pricing;
        pricing.set_discount(DiscountCategory::Special, amount);

        let updated = self
            .save_pricing(&mut tx, booking, current.event_uuid, pricing)
            .await?;

        tx.commit().await?;

        info!(
            booking_uuid = %booking,
            special_discount = amount,
            final_balance = updated.pricing.final_balance,
            "updated special discount"
        );

        self.sync.mirror(updated.uuid).await;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "bookings.service.recalculate",
        skip(self),
        fields(booking_uuid = %booking),
        err
    )]
    async fn recalculate(
        &self,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.bookings.lock_booking(&mut tx, booking).await?;

        let updated = self
            .save_pricing(&mut tx, booking, current.event_uuid, current.pricing)
            .await?;

        tx.commit().await?;

        if updated.pricing.final_balance != current.pricing.final_balance {
            info!(
                booking_uuid = %booking,
                from = current.pricing.final_balance,
                to = updated.pricing.final_balance,
                "corrected final balance"
            );
        }

        self.sync.mirror(updated.uuid).await;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait BookingsService: Send + Sync {
    /// Creates a pending booking with its final balance computed.
    async fn create_booking(
        &self,
        booking: NewBooking,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Retrieve a single booking.
    async fn get_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Retrieves all bookings, earliest wedding first.
    async fn list_bookings(&self) -> Result<Vec<BookingRecord>, BookingsServiceError>;

    /// Replaces the list price and deposit, rescaling any percentage event discount.
    async fn update_quote(
        &self,
        booking: BookingUuid,
        quote: QuoteUpdate,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Confirms a pending booking and assigns its partner code.
    async fn confirm_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Marks a confirmed booking as delivered.
    async fn deliver_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Cancels a pending or confirmed booking.
    async fn cancel_booking(
        &self,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Assigns an event running on `today`, or clears the event when `event` is `None`.
    async fn assign_event(
        &self,
        booking: BookingUuid,
        event: Option<EventUuid>,
        today: Date,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Applies another booking's partner code, granting the referral discount to both bookings.
    async fn apply_partner_code(
        &self,
        booking: BookingUuid,
        code: PartnerCode,
        today: Date,
    ) -> Result<AppliedReferral, BookingsServiceError>;

    /// Replaces the manual admin discount.
    async fn update_special_discount(
        &self,
        booking: BookingUuid,
        amount: u64,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Recomputes the final balance from the stored pricing columns.
    async fn recalculate(
        &self,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError>;
}
