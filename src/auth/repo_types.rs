use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::bookings::repo_types::Booking;

/// User record as persisted in the directory blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,                   // opaque, unique per record
    pub email: String,                // unique, compared case-sensitively
    #[serde(rename = "password")]
    pub password_digest: String,      // `hash_...` digest, never the plaintext
    pub full_name: String,
    pub phone: String,
    pub age: Option<String>,
    pub gender: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub profile_complete: bool,
    /// Keys this crate does not model, kept so older records survive a rewrite.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
