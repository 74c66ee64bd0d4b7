//! Test Helpers

use jiff::civil::{Date, date};

use crate::{
    domain::{
        bookings::{
            BookingsService, BookingsServiceError,
            data::NewBooking,
            records::{BookingRecord, BookingUuid, CustomerUuid},
        },
        events::{
            EventsService, EventsServiceError,
            data::NewEvent,
            records::{EventOffer, EventRecord, EventUuid},
        },
        reviews::{
            ReviewsService, ReviewsServiceError,
            data::NewReview,
            records::{ReviewRecord, ReviewUuid},
        },
    },
    test::TestContext,
};

/// Date service tests run "today".
pub(crate) const TODAY: Date = date(2026, 10, 17);

/// Wedding date of bookings created by [`create_booking`].
pub(crate) const WEDDING_DATE: Date = date(2027, 5, 1);

pub(crate) async fn create_booking(
    ctx: &TestContext,
    list_price: u64,
    deposit: u64,
) -> Result<BookingRecord, BookingsServiceError> {
    create_booking_for(ctx, CustomerUuid::new(), WEDDING_DATE, list_price, deposit).await
}

pub(crate) async fn create_booking_for(
    ctx: &TestContext,
    customer: CustomerUuid,
    wedding_date: Date,
    list_price: u64,
    deposit: u64,
) -> Result<BookingRecord, BookingsServiceError> {
    ctx.bookings
        .create_booking(NewBooking {
            uuid: BookingUuid::new(),
            customer_uuid: customer,
            customer_name: "Kim & Lee".to_string(),
            wedding_date,
            list_price,
            deposit,
        })
        .await
}

/// Create and confirm a booking, so it owns a partner code.
pub(crate) async fn confirmed_booking(
    ctx: &TestContext,
    list_price: u64,
) -> Result<BookingRecord, BookingsServiceError> {
    let booking = create_booking(ctx, list_price, 0).await?;

    ctx.bookings.confirm_booking(booking.uuid).await
}

/// Create an event running through October 2026.
pub(crate) async fn create_event(
    ctx: &TestContext,
    offer: EventOffer,
) -> Result<EventRecord, EventsServiceError> {
    ctx.events
        .create_event(NewEvent {
            uuid: EventUuid::new(),
            name: "Autumn fair".to_string(),
            offer,
            starts_on: date(2026, 10, 1),
            ends_on: date(2026, 10, 31),
        })
        .await
}

pub(crate) async fn submit_review(
    ctx: &TestContext,
    booking: BookingUuid,
) -> Result<ReviewRecord, ReviewsServiceError> {
    ctx.reviews
        .submit_review(NewReview {
            uuid: ReviewUuid::new(),
            booking_uuid: booking,
            url: "https://blog.example.com/our-wedding-film".to_string(),
        })
        .await
}
