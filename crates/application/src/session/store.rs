//! Session store: the single holder of the access token, user and cookies.
//!
//! Every mutation is mirrored into durable credential storage before it
//! returns, so a restart rebuilds the same state. The store is an explicit
//! object owned by the composition root; clones share state.

use std::fmt;
use std::sync::Arc;

use folio_domain::{AuthResponse, AuthUser, CookieJar, Session};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::ports::{CredentialStorage, StorageError};

/// Durable entry holding the JSON-encoded access token.
pub const ACCESS_TOKEN_KEY: &str = "auth-access-token";

/// Durable entry holding the JSON-encoded user summary.
pub const USER_DATA_KEY: &str = "auth-user-data";

/// Durable entry holding the JSON-encoded cookie jar.
pub const COOKIES_KEY: &str = "auth-cookies";

/// Errors raised by session mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The durable copy could not be read or written.
    #[error("credential storage failed: {0}")]
    Storage(#[from] StorageError),

    /// A value could not be encoded for storage.
    #[error("could not encode session entry: {0}")]
    Encode(String),
}

/// Shared, durably mirrored session state.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<Session>>,
    storage: Arc<dyn CredentialStorage>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates a signed-out store without reading durable storage.
    #[must_use]
    pub fn empty(storage: Arc<dyn CredentialStorage>) -> Self {
        Self {
            state: Arc::new(RwLock::new(Session::default())),
            storage,
        }
    }

    /// Rebuilds the session from durable storage.
    ///
    /// Missing entries mean signed out. An entry that no longer decodes is
    /// treated as missing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the storage itself cannot be read.
    pub async fn load(storage: Arc<dyn CredentialStorage>) -> Result<Self, SessionError> {
        let access_token = read_entry::<String>(storage.as_ref(), ACCESS_TOKEN_KEY)
            .await?
            .unwrap_or_default();
        let user = read_entry::<AuthUser>(storage.as_ref(), USER_DATA_KEY).await?;
        let mut cookies = read_entry::<CookieJar>(storage.as_ref(), COOKIES_KEY)
            .await?
            .unwrap_or_default();
        cookies.purge_expired();

        debug!(
            has_token = !access_token.is_empty(),
            has_user = user.is_some(),
            cookies = cookies.len(),
            "session loaded from credential storage"
        );

        let session = Session {
            cookies,
            ..Session::new(access_token, user)
        };
        Ok(Self {
            state: Arc::new(RwLock::new(session)),
            storage,
        })
    }

    /// Returns a copy of the current session.
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    /// Returns the current access token; empty when signed out.
    pub async fn access_token(&self) -> String {
        self.state.read().await.access_token.clone()
    }

    /// Returns the signed-in user, if any.
    pub async fn user(&self) -> Option<AuthUser> {
        self.state.read().await.user.clone()
    }

    /// Returns true if an access token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.has_token()
    }

    /// The `Cookie` header value to send to `url`, if any.
    pub async fn cookie_header(&self, url: &Url) -> Option<String> {
        self.state.read().await.cookies.header_for(url)
    }

    /// Applies `Set-Cookie` headers received from `origin`.
    ///
    /// The jar is written to storage only when it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable copy could not be written. The
    /// in-memory jar is already updated in that case.
    pub async fn store_cookies<'a, I>(&self, headers: I, origin: &Url) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut state = self.state.write().await;
        let mut changed = false;
        for header in headers {
            changed |= state.cookies.store(header, origin);
        }
        if !changed {
            return Ok(());
        }

        if state.cookies.is_empty() {
            self.storage.remove(COOKIES_KEY).await?;
        } else {
            let encoded = encode(&state.cookies)?;
            self.storage.set(COOKIES_KEY, &encoded).await?;
        }
        debug!(cookies = state.cookies.len(), "cookie jar stored");
        Ok(())
    }

    /// Replaces the access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable copy could not be written. The
    /// in-memory token is already updated in that case.
    pub async fn set_access_token(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        let encoded = encode(&token)?;
        let mut state = self.state.write().await;
        state.access_token = token;
        self.storage.set(ACCESS_TOKEN_KEY, &encoded).await?;
        debug!("access token stored");
        Ok(())
    }

    /// Replaces the user; `None` removes the durable entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable copy could not be written.
    pub async fn set_user(&self, user: Option<AuthUser>) -> Result<(), SessionError> {
        let encoded = user.as_ref().map(encode).transpose()?;
        let mut state = self.state.write().await;
        state.user = user;
        match encoded {
            Some(encoded) => self.storage.set(USER_DATA_KEY, &encoded).await?,
            None => self.storage.remove(USER_DATA_KEY).await?,
        }
        Ok(())
    }

    /// Stores the token and user from a login, registration or OAuth exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if either durable write fails.
    pub async fn establish(&self, auth: &AuthResponse) -> Result<(), SessionError> {
        self.set_access_token(auth.access.clone()).await?;
        self.set_user(Some(auth.user.clone())).await
    }

    /// Clears the access token but keeps the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable entry could not be removed.
    pub async fn reset_access_token(&self) -> Result<(), SessionError> {
        let mut state = self.state.write().await;
        state.access_token.clear();
        self.storage.remove(ACCESS_TOKEN_KEY).await?;
        Ok(())
    }

    /// Signs out: clears token, user and cookies in memory and in durable
    /// storage.
    ///
    /// Memory is cleared even if storage fails; every removal is attempted
    /// and the first failure is returned. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if a durable entry could not be removed.
    pub async fn reset(&self) -> Result<(), SessionError> {
        let mut state = self.state.write().await;
        *state = Session::default();
        let token = self.storage.remove(ACCESS_TOKEN_KEY).await;
        let user = self.storage.remove(USER_DATA_KEY).await;
        let cookies = self.storage.remove(COOKIES_KEY).await;
        debug!("session reset");
        token?;
        user?;
        cookies?;
        Ok(())
    }
}

fn encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, SessionError> {
    serde_json::to_string(value).map_err(|e| SessionError::Encode(e.to_string()))
}

async fn read_entry<T: DeserializeOwned>(
    storage: &dyn CredentialStorage,
    key: &str,
) -> Result<Option<T>, SessionError> {
    let Some(raw) = storage.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "ignoring undecodable credential entry");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::session::MemoryCredentialStorage;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn ada() -> AuthUser {
        AuthUser {
            id: Uuid::nil(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            avatar_url: None,
        }
    }

    fn origin() -> Url {
        Url::parse("https://folio.example/api/auth/user/login/").unwrap()
    }

    #[tokio::test]
    async fn test_load_from_empty_storage_is_signed_out() {
        let storage = Arc::new(MemoryCredentialStorage::new());
        let store = SessionStore::load(storage).await.unwrap();
        assert_eq!(store.snapshot().await, Session::default());
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_mutations_are_mirrored_as_json() {
        let storage = MemoryCredentialStorage::new();
        let store = SessionStore::empty(Arc::new(storage.clone()));

        store.set_access_token("T1").await.unwrap();
        store.set_user(Some(ada())).await.unwrap();

        assert_eq!(
            storage.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
            Some("\"T1\"")
        );
        let user_json = storage.get(USER_DATA_KEY).await.unwrap().unwrap();
        let user: AuthUser = serde_json::from_str(&user_json).unwrap();
        assert_eq!(user, ada());
    }

    #[tokio::test]
    async fn test_reload_reconstructs_state() {
        let storage = MemoryCredentialStorage::new();
        let store = SessionStore::empty(Arc::new(storage.clone()));
        store.set_access_token("T1").await.unwrap();
        store.set_user(Some(ada())).await.unwrap();

        let reloaded = SessionStore::load(Arc::new(storage)).await.unwrap();
        assert_eq!(reloaded.snapshot().await, Session::new("T1", Some(ada())));
    }

    #[tokio::test]
    async fn test_set_user_none_removes_entry() {
        let storage = MemoryCredentialStorage::new();
        let store = SessionStore::empty(Arc::new(storage.clone()));
        store.set_user(Some(ada())).await.unwrap();
        store.set_user(None).await.unwrap();

        assert_eq!(store.user().await, None);
        assert_eq!(storage.get(USER_DATA_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reset_access_token_keeps_user() {
        let storage = MemoryCredentialStorage::new();
        let store = SessionStore::empty(Arc::new(storage.clone()));
        store.set_access_token("T1").await.unwrap();
        store.set_user(Some(ada())).await.unwrap();

        store.reset_access_token().await.unwrap();

        assert_eq!(store.access_token().await, "");
        assert_eq!(store.user().await, Some(ada()));
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let storage = MemoryCredentialStorage::new();
        let store = SessionStore::empty(Arc::new(storage.clone()));
        store.set_access_token("T1").await.unwrap();
        store.set_user(Some(ada())).await.unwrap();
        store
            .store_cookies(["refresh_token=R1; Path=/"], &origin())
            .await
            .unwrap();

        store.reset().await.unwrap();
        let once = store.snapshot().await;
        let entries_once = storage.len().await;

        store.reset().await.unwrap();
        assert_eq!(store.snapshot().await, once);
        assert_eq!(storage.len().await, entries_once);
        assert!(once.is_empty());
        assert_eq!(entries_once, 0);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_ignored() {
        let storage = MemoryCredentialStorage::with_entries([
            (ACCESS_TOKEN_KEY, "not json"),
            (USER_DATA_KEY, "{\"id\": 5}"),
        ]);
        let store = SessionStore::load(Arc::new(storage)).await.unwrap();
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_establish_stores_token_and_user() {
        let store = SessionStore::empty(Arc::new(MemoryCredentialStorage::new()));
        let auth = AuthResponse {
            access: "T1".to_string(),
            refresh: String::new(),
            user: ada(),
        };
        store.establish(&auth).await.unwrap();
        assert_eq!(store.snapshot().await, Session::new("T1", Some(ada())));
    }

    #[tokio::test]
    async fn test_cookies_are_mirrored_and_reloaded() {
        let storage = MemoryCredentialStorage::new();
        let store = SessionStore::empty(Arc::new(storage.clone()));

        store
            .store_cookies(["refresh_token=R1; Path=/; HttpOnly"], &origin())
            .await
            .unwrap();

        assert!(storage.get(COOKIES_KEY).await.unwrap().is_some());
        let reloaded = SessionStore::load(Arc::new(storage)).await.unwrap();
        let refresh = Url::parse("https://folio.example/api/auth/user/token/refresh/").unwrap();
        assert_eq!(
            reloaded.cookie_header(&refresh).await.as_deref(),
            Some("refresh_token=R1")
        );
    }

    #[tokio::test]
    async fn test_unchanged_cookies_are_not_rewritten() {
        let storage = MemoryCredentialStorage::new();
        let store = SessionStore::empty(Arc::new(storage.clone()));

        store.store_cookies(["not a cookie"], &origin()).await.unwrap();

        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_deleted_cookie_removes_entry() {
        let storage = MemoryCredentialStorage::new();
        let store = SessionStore::empty(Arc::new(storage.clone()));
        store
            .store_cookies(["refresh_token=R1; Path=/"], &origin())
            .await
            .unwrap();

        store
            .store_cookies(["refresh_token=; Path=/; Max-Age=0"], &origin())
            .await
            .unwrap();

        assert_eq!(storage.get(COOKIES_KEY).await.unwrap(), None);
        assert_eq!(store.cookie_header(&origin()).await, None);
    }

    #[tokio::test]
    async fn test_expired_cookies_are_dropped_on_load() {
        let jar = r#"[{"name":"refresh_token","value":"R0","domain":"folio.example","host_only":true,"path":"/","expires":"2001-01-01T00:00:00Z"}]"#;
        let storage = MemoryCredentialStorage::with_entries([(COOKIES_KEY, jar)]);

        let store = SessionStore::load(Arc::new(storage)).await.unwrap();

        assert_eq!(store.cookie_header(&origin()).await, None);
        assert!(store.snapshot().await.cookies.is_empty());
    }
}
