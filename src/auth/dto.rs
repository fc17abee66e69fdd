use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::auth::repo_types::UserRecord;
use crate::bookings::repo_types::Booking;

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Fields a user may change on their own profile.
///
/// Anything else in an incoming payload (`id`, `email`, `password`, ...) is ignored.
/// For `age` and `gender`, an absent key leaves the value alone, while `null`
/// or `""` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub age: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub gender: Option<Option<String>>,
    pub profile_complete: Option<bool>,
}

/// Marks a key as present even when its value is `null`.
fn present<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(de).map(Some)
}

/// Contact form on the landing page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Redacted user record: everything except the password digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub email: String,
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
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<&UserRecord> for PublicUser {
    fn from(u: &UserRecord) -> Self {
        Self {
            id: u.id.clone(),
            email: u.email.clone(),
            full_name: u.full_name.clone(),
            phone: u.phone.clone(),
            age: u.age.clone(),
            gender: u.gender.clone(),
            created_at: u.created_at,
            bookings: u.bookings.clone(),
            favorites: u.favorites.clone(),
            profile_complete: u.profile_complete,
            extra: u.extra.clone(),
        }
    }
}

/// `{"user": ...}` payload of register, login and profile update results.
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: PublicUser,
}
