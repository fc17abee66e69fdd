use thiserror::Error;

use crate::i18n::{Locale, Message};

/// A single failed input rule. Registration reports all of them at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    NameTooShort,
    InvalidEmail,
    InvalidPhone,
    PasswordTooShort,
    PasswordMismatch,
    PasswordRequired,
}

impl ValidationIssue {
    pub fn message(self) -> Message {
        match self {
            ValidationIssue::NameTooShort => Message::NameTooShort,
            ValidationIssue::InvalidEmail => Message::InvalidEmail,
            ValidationIssue::InvalidPhone => Message::InvalidPhone,
            ValidationIssue::PasswordTooShort => Message::PasswordTooShort,
            ValidationIssue::PasswordMismatch => Message::PasswordMismatch,
            ValidationIssue::PasswordRequired => Message::PasswordRequired,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0:?}")]
    Validation(Vec<ValidationIssue>),

    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("user not found")]
    UserNotFound,

    #[error("comparison list is full ({capacity} labs)")]
    ComparisonFull { capacity: usize },

    #[error("storage: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl StoreError {
    /// Localised messages for the UI, one per validation issue.
    pub fn messages(&self, locale: Locale) -> Vec<String> {
        match self {
            StoreError::Validation(issues) => issues
                .iter()
                .map(|i| i.message().render(locale))
                .collect(),
            StoreError::DuplicateEmail => vec![Message::EmailTaken.render(locale)],
            StoreError::InvalidCredentials => vec![Message::InvalidCredentials.render(locale)],
            StoreError::NotAuthenticated => vec![Message::LoginRequired.render(locale)],
            StoreError::UserNotFound => vec![Message::UserNotFound.render(locale)],
            StoreError::ComparisonFull { capacity } => {
                vec![Message::ComparisonFull { capacity: *capacity }.render(locale)]
            }
            StoreError::Storage(_) => vec![Message::StorageFailure.render(locale)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_yields_one_message_per_issue_in_order() {
        let err = StoreError::Validation(vec![
            ValidationIssue::InvalidEmail,
            ValidationIssue::PasswordMismatch,
        ]);
        assert_eq!(
            err.messages(Locale::En),
            vec!["Invalid email address", "Passwords do not match"]
        );
    }

    #[test]
    fn storage_errors_do_not_leak_details_to_ui() {
        let err = StoreError::from(anyhow::anyhow!("disk on fire"));
        let msgs = err.messages(Locale::En);
        assert_eq!(msgs.len(), 1);
        assert!(!msgs[0].contains("disk"));
        assert!(err.to_string().contains("disk on fire"));
    }
}
