pub mod dto;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub(crate) mod session;

pub use services::{validate_contact_form, validate_login, validate_registration};
