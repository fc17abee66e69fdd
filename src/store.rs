use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{error, info, warn};

use crate::auth::{dto::PublicUser, repo::Directory, repo_types::UserRecord, session};
use crate::error::StoreError;
use crate::events::StoreEvent;
use crate::i18n::Locale;
use crate::state::AppState;
use crate::storage::read_json;

const EVENT_CAPACITY: usize = 32;

pub(crate) struct Inner {
    pub directory: Directory,
    pub session: Option<PublicUser>,
    pub comparison: Vec<String>,
}

/// The client's local data: user directory, current session and comparison list.
///
/// Built once at start and shared by reference. Every mutation holds the lock
/// through its persistence writes, so operations never interleave.
pub struct LocalStore {
    state: AppState,
    inner: Mutex<Inner>,
    events: broadcast::Sender<StoreEvent>,
}

impl LocalStore {
    /// Loads all persisted entries. A session whose user is no longer in the
    /// directory is discarded and its entry removed.
    pub async fn open(state: AppState) -> Result<Self, StoreError> {
        let keys = &state.config.keys;
        let storage = state.storage.as_ref();

        let directory = Directory::load(storage, &keys.users).await?;
        let stored_session = session::load(storage, &keys.session).await?;
        let comparison: Vec<String> = read_json(storage, &keys.comparison)
            .await?
            .unwrap_or_default();

        let session = match stored_session {
            Some(s) => match directory.find_by_id(&s.id) {
                Some(record) => Some(PublicUser::from(record)),
                None => {
                    warn!(user_id = %s.id, "dropping session for unknown user");
                    session::clear(storage, &keys.session).await?;
                    None
                }
            },
            None => None,
        };

        info!(
            users = directory.len(),
            logged_in = session.is_some(),
            "local store opened"
        );

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            state,
            inner: Mutex::new(Inner {
                directory,
                session,
                comparison,
            }),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn locale(&self) -> Locale {
        self.state.config.locale
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Snapshot of the full directory, digests included.
    pub async fn directory(&self) -> Directory {
        self.inner.lock().await.directory.clone()
    }

    pub async fn current_user(&self) -> Option<PublicUser> {
        self.inner.lock().await.session.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.inner.lock().await.session.is_some()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().await
    }

    pub(crate) fn emit(&self, event: StoreEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    pub(crate) async fn write_directory(&self, directory: &Directory) -> Result<(), StoreError> {
        directory
            .save(self.state.storage.as_ref(), &self.state.config.keys.users)
            .await
            .map_err(|e| {
                error!(error = %e, "persist directory failed");
                StoreError::Storage(e)
            })
    }

    pub(crate) async fn write_session(
        &self,
        inner: &mut Inner,
        user: PublicUser,
    ) -> Result<(), StoreError> {
        session::save(
            self.state.storage.as_ref(),
            &self.state.config.keys.session,
            &user,
        )
        .await
        .map_err(|e| {
            error!(error = %e, "persist session failed");
            StoreError::Storage(e)
        })?;
        inner.session = Some(user.clone());
        self.emit(StoreEvent::SessionChanged(Some(user)));
        Ok(())
    }

    pub(crate) async fn clear_session(&self, inner: &mut Inner) -> Result<(), StoreError> {
        session::clear(self.state.storage.as_ref(), &self.state.config.keys.session)
            .await
            .map_err(|e| {
                error!(error = %e, "remove session failed");
                StoreError::Storage(e)
            })?;
        inner.session = None;
        self.emit(StoreEvent::SessionChanged(None));
        Ok(())
    }

    /// Runs `f` on a copy of the session user's record. When `f` reports a
    /// change, the directory and the refreshed session are written before the
    /// in-memory state is replaced.
    pub(crate) async fn update_current<T>(
        &self,
        f: impl FnOnce(&mut UserRecord) -> (T, bool),
    ) -> Result<(T, PublicUser), StoreError> {
        let mut inner = self.inner.lock().await;
        let user_id = match inner.session.as_ref() {
            Some(s) => s.id.clone(),
            None => {
                warn!("operation requires a session");
                return Err(StoreError::NotAuthenticated);
            }
        };

        let mut next = inner.directory.clone();
        let Some(record) = next.find_by_id_mut(&user_id) else {
            warn!(%user_id, "session user missing from directory");
            return Err(StoreError::UserNotFound);
        };
        let (out, changed) = f(record);
        let public = PublicUser::from(&*record);

        if changed {
            self.write_directory(&next).await?;
            inner.directory = next;
            self.write_session(&mut inner, public.clone()).await?;
        }
        Ok((out, public))
    }

    /// Reads the session user's directory record, if both exist.
    pub(crate) async fn read_current<T>(&self, f: impl FnOnce(&UserRecord) -> T) -> Option<T> {
        let inner = self.inner.lock().await;
        let id = &inner.session.as_ref()?.id;
        inner.directory.find_by_id(id).map(f)
    }
}
