use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{ContactForm, LoginRequest, ProfileUpdate, PublicUser, RegisterRequest},
        password::{digest_password, verify_password},
        repo_types::UserRecord,
    },
    error::{StoreError, ValidationIssue},
    events::{Notice, NoticeLevel, StoreEvent, View},
    i18n::Message,
    store::LocalStore,
};

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const PHONE_DIGITS: usize = 10;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Ten digits once spaces, hyphens and parentheses are stripped.
pub(crate) fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '-' | '(' | ')')))
        .collect();
    digits.len() == PHONE_DIGITS && digits.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    js_len(name.trim()) >= MIN_NAME_LEN
}

/// Length as the browser counts it (UTF-16 code units).
fn js_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Every failing rule, in form order.
pub fn validate_registration(req: &RegisterRequest) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if !is_valid_name(&req.full_name) {
        issues.push(ValidationIssue::NameTooShort);
    }
    if !is_valid_email(&req.email) {
        issues.push(ValidationIssue::InvalidEmail);
    }
    if !is_valid_phone(&req.phone) {
        issues.push(ValidationIssue::InvalidPhone);
    }
    if js_len(&req.password) < MIN_PASSWORD_LEN {
        issues.push(ValidationIssue::PasswordTooShort);
    }
    if req.password != req.confirm_password {
        issues.push(ValidationIssue::PasswordMismatch);
    }
    issues
}

pub fn validate_login(req: &LoginRequest) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if !is_valid_email(&req.email) {
        issues.push(ValidationIssue::InvalidEmail);
    }
    if req.password.is_empty() {
        issues.push(ValidationIssue::PasswordRequired);
    }
    issues
}

/// Same name/email/phone rules as registration, for the contact form.
pub fn validate_contact_form(form: &ContactForm) -> Result<(), StoreError> {
    let mut issues = Vec::new();
    if !is_valid_name(&form.name) {
        issues.push(ValidationIssue::NameTooShort);
    }
    if !is_valid_email(&form.email) {
        issues.push(ValidationIssue::InvalidEmail);
    }
    if !is_valid_phone(&form.phone) {
        issues.push(ValidationIssue::InvalidPhone);
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Validation(issues))
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

impl ProfileUpdate {
    /// Shallow merge of the allow-listed fields onto `user`.
    pub(crate) fn apply(self, user: &mut UserRecord) {
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(age) = self.age {
            user.age = non_empty(age);
        }
        if let Some(gender) = self.gender {
            user.gender = non_empty(gender);
        }
        if let Some(done) = self.profile_complete {
            user.profile_complete = done;
        }
    }
}

impl LocalStore {
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterRequest) -> Result<PublicUser, StoreError> {
        let issues = validate_registration(&req);
        if !issues.is_empty() {
            warn!(?issues, "registration rejected");
            return Err(StoreError::Validation(issues));
        }

        let mut inner = self.lock().await;
        if inner.directory.find_by_email(&req.email).is_some() {
            warn!("email already registered");
            return Err(StoreError::DuplicateEmail);
        }

        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            password_digest: digest_password(&req.password),
            email: req.email,
            full_name: req.full_name,
            phone: req.phone,
            age: non_empty(req.age),
            gender: non_empty(req.gender),
            created_at: OffsetDateTime::now_utc(),
            bookings: Vec::new(),
            favorites: Vec::new(),
            profile_complete: false,
            extra: Default::default(),
        };

        let mut next = inner.directory.clone();
        next.insert(user.clone());
        self.write_directory(&next).await?;
        inner.directory = next;

        let public = PublicUser::from(&user);
        self.write_session(&mut inner, public.clone()).await?;

        info!(user_id = %user.id, "user registered");
        self.notify_success(Message::RegisterSuccess);
        self.emit(StoreEvent::Navigate(View::Profile));
        Ok(public)
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<PublicUser, StoreError> {
        let issues = validate_login(&req);
        if !issues.is_empty() {
            warn!(?issues, "login rejected");
            return Err(StoreError::Validation(issues));
        }

        let mut inner = self.lock().await;
        let user = match inner.directory.find_by_email(&req.email) {
            Some(u) => u,
            None => {
                warn!("login unknown email");
                return Err(StoreError::InvalidCredentials);
            }
        };

        if !verify_password(&req.password, &user.password_digest) {
            warn!(user_id = %user.id, "login invalid password");
            return Err(StoreError::InvalidCredentials);
        }

        let public = PublicUser::from(user);
        self.write_session(&mut inner, public.clone()).await?;

        info!(user_id = %public.id, "user logged in");
        self.notify_success(Message::LoginSuccess);
        Ok(public)
    }

    fn notify_success(&self, message: Message) {
        self.emit(StoreEvent::Notice(Notice {
            level: NoticeLevel::Success,
            message: message.render(self.locale()),
        }));
    }

    /// Ends the session. Does nothing when nobody is logged in.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), StoreError> {
        let mut inner = self.lock().await;
        let Some(user_id) = inner.session.as_ref().map(|s| s.id.clone()) else {
            return Ok(());
        };
        self.clear_session(&mut inner).await?;

        info!(%user_id, "user logged out");
        self.emit(StoreEvent::Navigate(View::Landing));
        Ok(())
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<PublicUser, StoreError> {
        let ((), user) = self
            .update_current(|record| {
                update.apply(record);
                ((), true)
            })
            .await?;
        info!(user_id = %user.id, "profile updated");
        Ok(user)
    }
}


#[cfg(test)]
mod store_tests {
    use super::*;
    use crate::i18n::Locale;
    use crate::test_support::{alice, bob, fresh_store};

    #[tokio::test]
    async fn register_creates_record_and_logs_in() {
        let store = fresh_store().await;
        let user = store.register(alice()).await.unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.age.as_deref(), Some("31"));
        assert!(user.bookings.is_empty());
        assert!(!user.profile_complete);
        assert_eq!(store.current_user().await, Some(user.clone()));

        let dir = store.directory().await;
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.users()[0].password_digest, "hash_wkzr0h");
    }

    #[tokio::test]
    async fn register_never_stores_or_exposes_plaintext() {
        let store = fresh_store().await;
        let user = store.register(alice()).await.unwrap();

        let exposed = serde_json::to_string(&user).unwrap();
        assert!(!exposed.contains("secret1"));
        assert!(!exposed.contains("hash_"));
        assert!(!exposed.contains("password"));

        let state = store.state();
        let blob = state
            .storage
            .get_item(&state.config.keys.users)
            .await
            .unwrap()
            .unwrap();
        let blob = String::from_utf8(blob.to_vec()).unwrap();
        assert!(!blob.contains("secret1"));
        assert!(blob.contains("hash_wkzr0h"));

        let session_blob = state
            .storage
            .get_item(&state.config.keys.session)
            .await
            .unwrap()
            .unwrap();
        assert!(!String::from_utf8(session_blob.to_vec())
            .unwrap()
            .contains("hash_"));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_mutation() {
        let store = fresh_store().await;
        store.register(alice()).await.unwrap();

        let mut again = alice();
        again.full_name = "Someone Else".into();
        let err = store.register(again).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(err.messages(Locale::En), vec!["Email already registered"]);

        let dir = store.directory().await;
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.users()[0].full_name, "Alice Example");
    }

    #[tokio::test]
    async fn email_uniqueness_is_case_sensitive() {
        let store = fresh_store().await;
        store.register(alice()).await.unwrap();
        let mut upper = alice();
        upper.email = "Alice@example.com".into();
        store.register(upper).await.unwrap();
        assert_eq!(store.directory().await.len(), 2);
    }

    #[tokio::test]
    async fn short_password_fails_validation_and_creates_nothing() {
        let store = fresh_store().await;
        let mut req = alice();
        req.password = "abc12".into();
        req.confirm_password = "abc12".into();

        let err = store.register(req).await.unwrap_err();
        match &err {
            StoreError::Validation(issues) => {
                assert_eq!(issues, &vec![ValidationIssue::PasswordTooShort])
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            err.messages(Locale::En),
            vec!["Password must be at least 6 characters"]
        );
        assert!(store.directory().await.is_empty());
        assert!(!store.is_logged_in().await);
    }

    #[tokio::test]
    async fn empty_optional_fields_are_stored_as_absent() {
        let store = fresh_store().await;
        let mut req = alice();
        req.age = Some(String::new());
        req.gender = Some(String::new());
        let user = store.register(req).await.unwrap();
        assert_eq!(user.age, None);
        assert_eq!(user.gender, None);
    }

    #[tokio::test]
    async fn login_checks_digest() {
        let store = fresh_store().await;
        store.register(alice()).await.unwrap();
        store.logout().await.unwrap();

        let wrong = store
            .login(LoginRequest {
                email: "alice@example.com".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(wrong, StoreError::InvalidCredentials));
        assert!(!store.is_logged_in().await);

        let user = store
            .login(LoginRequest {
                email: "alice@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(store.is_logged_in().await);
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_look_the_same() {
        let store = fresh_store().await;
        store.register(alice()).await.unwrap();

        let unknown = store
            .login(LoginRequest {
                email: "nobody@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap_err();
        let wrong = store
            .login(LoginRequest {
                email: "alice@example.com".into(),
                password: "secret2".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(unknown.messages(Locale::Ar), wrong.messages(Locale::Ar));
    }

    #[tokio::test]
    async fn login_switches_session_between_users() {
        let store = fresh_store().await;
        store.register(alice()).await.unwrap();
        let bob_user = store.register(bob()).await.unwrap();
        assert_eq!(store.current_user().await.unwrap().id, bob_user.id);

        let alice_user = store
            .login(LoginRequest {
                email: "alice@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        assert_eq!(store.current_user().await.unwrap().id, alice_user.id);
    }

    #[tokio::test]
    async fn logout_is_idempotent_and_signals_landing() {
        let store = fresh_store().await;
        store.register(alice()).await.unwrap();
        let mut events = store.subscribe();

        store.logout().await.unwrap();
        assert!(!store.is_logged_in().await);
        assert_eq!(events.recv().await.unwrap(), StoreEvent::SessionChanged(None));
        assert_eq!(
            events.recv().await.unwrap(),
            StoreEvent::Navigate(View::Landing)
        );

        store.logout().await.unwrap();
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn update_profile_requires_session() {
        let store = fresh_store().await;
        store.register(alice()).await.unwrap();
        store.logout().await.unwrap();
        let before = store.directory().await;

        let err = store
            .update_profile(ProfileUpdate {
                full_name: Some("Mallory".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotAuthenticated));
        assert_eq!(store.directory().await, before);
    }

    #[tokio::test]
    async fn update_profile_merges_allowed_fields_only() {
        let store = fresh_store().await;
        let original = store.register(alice()).await.unwrap();

        let update: ProfileUpdate = serde_json::from_value(serde_json::json!({
            "fullName": "Alice Updated",
            "profileComplete": true,
            "password": "hash_0",
            "id": "hijacked",
            "email": "mallory@example.com"
        }))
        .unwrap();
        let user = store.update_profile(update).await.unwrap();

        assert_eq!(user.full_name, "Alice Updated");
        assert!(user.profile_complete);
        assert_eq!(user.id, original.id);
        assert_eq!(user.email, original.email);
        assert_eq!(user.phone, original.phone);
        assert_eq!(store.current_user().await, Some(user));

        let dir = store.directory().await;
        assert_eq!(dir.users()[0].password_digest, "hash_wkzr0h");
    }

    #[tokio::test]
    async fn update_profile_null_clears_and_absent_keeps() {
        let store = fresh_store().await;
        store.register(alice()).await.unwrap();

        let update: ProfileUpdate =
            serde_json::from_value(serde_json::json!({"age": null})).unwrap();
        let user = store.update_profile(update).await.unwrap();
        assert_eq!(user.age, None);
        assert_eq!(user.gender.as_deref(), Some("female"));

        let update: ProfileUpdate =
            serde_json::from_value(serde_json::json!({"gender": "", "age": "40"})).unwrap();
        let user = store.update_profile(update).await.unwrap();
        assert_eq!(user.age.as_deref(), Some("40"));
        assert_eq!(user.gender, None);
    }

    #[tokio::test]
    async fn update_profile_for_vanished_record_reports_user_not_found() {
        let state = crate::AppState::fake();
        let store = LocalStore::open(state.clone()).await.unwrap();
        store.register(alice()).await.unwrap();

        // another client replaced the directory, session kept in memory
        let mut inner = store.lock().await;
        inner.directory = Default::default();
        drop(inner);

        let err = store
            .update_profile(ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound));
    }

    #[tokio::test]
    async fn register_emits_session_notice_then_profile_navigation() {
        let store = fresh_store().await;
        let mut events = store.subscribe();
        let user = store.register(alice()).await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            StoreEvent::SessionChanged(Some(user))
        );
        assert_eq!(
            events.recv().await.unwrap(),
            StoreEvent::Notice(Notice {
                level: NoticeLevel::Success,
                message: "Account created".into(),
            })
        );
        assert_eq!(
            events.recv().await.unwrap(),
            StoreEvent::Navigate(View::Profile)
        );
    }

    #[tokio::test]
    async fn login_announces_success_only_when_it_succeeds() {
        let state = crate::AppState::fake();
        let config = crate::config::AppConfig {
            locale: Locale::Ar,
            ..(*state.config).clone()
        };
        let state = crate::AppState::from_parts(std::sync::Arc::new(config), state.storage);
        let store = LocalStore::open(state).await.unwrap();
        store.register(alice()).await.unwrap();
        store.logout().await.unwrap();
        let mut events = store.subscribe();

        store
            .login(LoginRequest {
                email: "alice@example.com".into(),
                password: "wrong1".into(),
            })
            .await
            .unwrap_err();
        assert!(events.try_recv().is_err());

        let user = store
            .login(LoginRequest {
                email: "alice@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        assert_eq!(
            events.recv().await.unwrap(),
            StoreEvent::SessionChanged(Some(user))
        );
        assert_eq!(
            events.recv().await.unwrap(),
            StoreEvent::Notice(Notice {
                level: NoticeLevel::Success,
                message: "تم تسجيل الدخول بنجاح".into(),
            })
        );
    }
}
