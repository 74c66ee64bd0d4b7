//! Reviews service.

use async_trait::async_trait;
use mockall::automock;
use reelbook::discounts::DiscountCategory;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        bookings::repository::PgBookingsRepository,
        pricing::PricingPolicy,
        reservations::ReservationSync,
        reviews::{
            data::NewReview,
            errors::ReviewsServiceError,
            records::{ReviewRecord, ReviewStatus, ReviewUuid},
            repository::PgReviewsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgReviewsService {
    db: Db,
    reviews: PgReviewsRepository,
    bookings: PgBookingsRepository,
    pricing: PricingPolicy,
    sync: ReservationSync,
}

impl PgReviewsService {
    #[must_use]
    pub fn new(db: Db, pricing: PricingPolicy) -> Self {
        Self {
            sync: ReservationSync::new(db.clone()),
            db,
            reviews: PgReviewsRepository::new(),
            bookings: PgBookingsRepository::new(),
            pricing,
        }
    }

    /// Move a review to `next` and reprice its booking from the new approved review count.
    async fn moderate(
        &self,
        review: ReviewUuid,
        next: ReviewStatus,
    ) -> Result<ReviewRecord, ReviewsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.reviews.lock_review(&mut tx, review).await?;

        if !current.status.can_transition_to(next) {
            return Err(ReviewsServiceError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }

        let booking = self
            .bookings
            .lock_booking(&mut tx, current.booking_uuid)
            .await?;

        if !booking.status.accepts_pricing_changes() {
            return Err(ReviewsServiceError::Locked(booking.status));
        }

        let updated = self.reviews.update_status(&mut tx, review, next).await?;

        let approved = self
            .reviews
            .count_approved(&mut tx, booking.uuid)
            .await?;

        let discount = self.pricing.review_discount(u32::try_from(approved)?)?;

        let mut pricing = booking.pricing;
        pricing.set_discount(DiscountCategory::Review, discount);

        let pricing = self.pricing.reprice(pricing)?;

        let booking = self
            .bookings
            .update_pricing(&mut tx, booking.uuid, booking.event_uuid, &pricing)
            .await?;

        tx.commit().await?;

        info!(
            review_uuid = %review,
            booking_uuid = %booking.uuid,
            status = %next,
            approved_reviews = approved,
            review_discount = discount,
            final_balance = booking.pricing.final_balance,
            "moderated review"
        );

        self.sync.mirror(booking.uuid).await;

        Ok(updated)
    }
}

#[async_trait]
impl ReviewsService for PgReviewsService {
    #[tracing::instrument(
        name = "reviews.service.submit_review",
        skip(self, review),
        fields(review_uuid = %review.uuid, booking_uuid = %review.booking_uuid),
        err
    )]
    async fn submit_review(&self, review: NewReview) -> Result<ReviewRecord, ReviewsServiceError> {
        if review.url.trim().is_empty() {
            return Err(ReviewsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let record = self.reviews.create_review(&mut tx, &review).await?;

        tx.commit().await?;

        info!(review_uuid = %record.uuid, "submitted review");

        Ok(record)
    }

    #[tracing::instrument(name = "reviews.service.approve_review", skip(self), err)]
    async fn approve_review(&self, review: ReviewUuid) -> Result<ReviewRecord, ReviewsServiceError> {
        self.moderate(review, ReviewStatus::Approved).await
    }

    #[tracing::instrument(name = "reviews.service.cancel_review", skip(self), err)]
    async fn cancel_review(&self, review: ReviewUuid) -> Result<ReviewRecord, ReviewsServiceError> {
        self.moderate(review, ReviewStatus::Cancelled).await
    }
}

#[automock]
#[async_trait]
pub trait ReviewsService: Send + Sync {
    /// Submits a pending review for a booking.
    async fn submit_review(&self, review: NewReview) -> Result<ReviewRecord, ReviewsServiceError>;

    /// Approves a pending review and reprices its booking.
    async fn approve_review(&self, review: ReviewUuid) -> Result<ReviewRecord, ReviewsServiceError>;

    /// Cancels a pending or approved review and reprices its booking.
    async fn cancel_review(&self, review: ReviewUuid) -> Result<ReviewRecord, ReviewsServiceError>;
}
