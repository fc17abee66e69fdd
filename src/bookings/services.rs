use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    bookings::{
        dto::{BookingRequest, RESERVED_KEYS},
        repo_types::{Booking, BookingStatus},
    },
    error::StoreError,
    store::LocalStore,
};

impl Booking {
    fn confirmed(mut details: BookingRequest) -> Self {
        details.retain(|k, _| !RESERVED_KEYS.contains(&k.as_str()));
        Self {
            id: Uuid::new_v4().to_string(),
            details,
            created_at: OffsetDateTime::now_utc(),
            status: BookingStatus::Confirmed,
        }
    }
}

impl LocalStore {
    /// Appends a confirmed booking to the logged-in user's record.
    #[instrument(skip(self, payload))]
    pub async fn add_booking(&self, payload: BookingRequest) -> Result<Booking, StoreError> {
        let booking = Booking::confirmed(payload);
        let (booking, user) = self
            .update_current(move |record| {
                record.bookings.push(booking.clone());
                (booking, true)
            })
            .await?;
        info!(user_id = %user.id, booking_id = %booking.id, "booking added");
        Ok(booking)
    }

    /// Bookings of the logged-in user; empty without a session.
    pub async fn bookings(&self) -> Vec<Booking> {
        self.read_current(|record| record.bookings.clone())
            .await
            .unwrap_or_default()
    }
}
