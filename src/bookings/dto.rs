use serde::Serialize;
use serde_json::{Map, Value};

use crate::bookings::repo_types::Booking;

/// Caller-supplied booking fields (lab id, date, time slot, tests...).
pub type BookingRequest = Map<String, Value>;

/// Keys the store assigns itself; caller values for them are dropped.
pub const RESERVED_KEYS: [&str; 3] = ["id", "createdAt", "status"];

/// `{"booking": ...}` payload of the add-booking result.
#[derive(Debug, Serialize)]
pub struct BookingEnvelope {
    pub booking: Booking,
}
