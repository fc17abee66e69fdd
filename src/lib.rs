//! Client-side data layer for the Clinicalab booking site.
//!
//! [`LocalStore`] keeps the user directory, the current session and the lab
//! comparison list in a [`storage::KeyValueStore`], and publishes
//! [`events::StoreEvent`]s for whatever UI sits on top.

pub mod auth;
pub mod bookings;
pub mod comparison;
pub mod config;
pub mod error;
pub mod events;
pub mod favorites;
pub mod i18n;
pub mod logging;
pub mod response;
pub mod search;
pub mod state;
pub mod storage;
pub mod store;

pub use error::StoreError;
pub use state::AppState;
pub use store::LocalStore;
