use serde::Serialize;

use crate::error::StoreError;
use crate::i18n::Locale;

/// The `{success, errors?, <data>?}` shape the presentation layer consumes.
///
/// `data` is flattened, so `OperationResult<UserEnvelope>` serializes as
/// `{"success": true, "user": {...}}`.
#[derive(Debug, Serialize)]
pub struct OperationResult<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(flatten)]
    pub data: Option<T>,
}

/// Payload for operations that only report success.
#[derive(Debug, Serialize)]
pub struct NoData {}

impl<T: Serialize> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            errors: None,
            data: Some(data),
        }
    }

    pub fn failed(err: &StoreError, locale: Locale) -> Self {
        Self {
            success: false,
            errors: Some(err.messages(locale)),
            data: None,
        }
    }

    pub fn from_result(result: Result<T, StoreError>, locale: Locale) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failed(&err, locale),
        }
    }
}
