use serde::Serialize;

use crate::auth::dto::PublicUser;

/// Views the UI layer should navigate to after certain operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Landing,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A short toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Published on the store's broadcast channel; subscribers render from these.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    SessionChanged(Option<PublicUser>),
    Navigate(View),
    Notice(Notice),
}
