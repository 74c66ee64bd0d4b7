//! App Context

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        bookings::{BookingsService, PgBookingsService},
        events::{EventsService, PgEventsService},
        pricing::PricingPolicy,
        reservations::{PgReservationsService, ReservationsService},
        reviews::{PgReviewsService, ReviewsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub bookings: Arc<dyn BookingsService>,
    pub events: Arc<dyn EventsService>,
    pub reviews: Arc<dyn ReviewsService>,
    pub reservations: Arc<dyn ReservationsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, pricing: PricingPolicy) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_pool(pool, pricing))
    }

    /// Build application context over an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool, pricing: PricingPolicy) -> Self {
        let db = Db::new(pool);

        Self {
            bookings: Arc::new(PgBookingsService::new(db.clone(), pricing)),
            events: Arc::new(PgEventsService::new(db.clone())),
            reviews: Arc::new(PgReviewsService::new(db.clone(), pricing)),
            reservations: Arc::new(PgReservationsService::new(db)),
        }
    }
}
