//! Authenticated identity for the lifetime of a client process (or browser tab).
//!
//! The store is an explicit object handed to views; it never enforces routing
//! itself. Views that need an identity ask [`Session::identity`] and redirect.

use crate::api::SocialApi;
use crate::error::{NetworkClientError, Result};
use crate::models::{Identity, LoginRequest, User};
use crate::route::Route;
use std::cell::RefCell;

pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl Session {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(identity) => Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    /// Whether the viewer is the user with the given id.
    pub fn is_user(&self, user_id: i64) -> bool {
        self.identity().is_some_and(|identity| identity.id == user_id)
    }
}

/// Durable storage for the session identity.
pub trait IdentityStore {
    fn load(&self) -> Result<Option<Identity>>;
    fn save(&self, identity: &Identity) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Keeps the identity in memory only.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    identity: RefCell<Option<Identity>>,
}

impl MemoryIdentityStore {
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            identity: RefCell::new(Some(identity)),
        }
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<Option<Identity>> {
        Ok(self.identity.borrow().clone())
    }

    fn save(&self, identity: &Identity) -> Result<()> {
        *self.identity.borrow_mut() = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.identity.borrow_mut().take();
        Ok(())
    }
}

#[derive(Debug)]
pub struct SessionStore<S> {
    store: S,
    session: Session,
    loading: bool,
    error: Option<String>,
}

impl<S: IdentityStore> SessionStore<S> {
    /// Creates a store in the loading state; call [`SessionStore::restore`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            session: Session::Anonymous,
            loading: true,
            error: None,
        }
    }

    /// Best-effort restore of a previously saved identity.
    pub fn restore(&mut self) -> &Session {
        match self.store.load() {
            Ok(Some(identity)) => {
                tracing::debug!("Restored session for {}", identity.username);
                self.session = Session::Authenticated(identity);
            }
            Ok(None) => {}
            Err(e) => tracing::error!("Authentication check failed: {}", e),
        }
        self.loading = false;
        &self.session
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn begin_login(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Applies the outcome of a login call. Returns where to navigate on
    /// success; on failure the previous session is left untouched.
    pub fn finish_login(&mut self, result: Result<User>) -> Option<Route> {
        self.loading = false;
        match result {
            Ok(user) => {
                let identity = Identity::from(&user);
                if let Err(e) = self.store.save(&identity) {
                    tracing::warn!("Failed to persist identity: {}", e);
                }
                tracing::info!("Logged in as {}", identity.username);
                self.session = Session::Authenticated(identity);
                self.error = None;
                Some(Route::Home)
            }
            Err(e) => {
                tracing::error!("Login error: {}", e);
                self.error = Some(e.detail().unwrap_or(LOGIN_FAILED).to_string());
                None
            }
        }
    }

    pub async fn login<A: SocialApi + ?Sized>(
        &mut self,
        api: &A,
        username: &str,
        password: &str,
    ) -> Option<Route> {
        self.begin_login();
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let result = api.login(&req).await;
        self.finish_login(result)
    }

    /// Drops the local identity immediately, whatever happens on the network.
    pub fn logout_local(&mut self) -> Route {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear persisted identity: {}", e);
        }
        self.session = Session::Anonymous;
        self.error = None;
        self.loading = false;
        Route::Login
    }

    /// Clears the identity and notifies the backend; the notification is
    /// best-effort and its failure is only logged.
    pub async fn logout<A: SocialApi + ?Sized>(&mut self, api: &A) -> Route {
        let route = self.logout_local();
        report_logout(api.logout().await);
        route
    }
}

pub fn report_logout(result: std::result::Result<(), NetworkClientError>) {
    match result {
        Ok(()) => tracing::debug!("Server session closed"),
        Err(e) => tracing::warn!("Logout error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    fn alice() -> Identity {
        Identity {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
        }
    }

    #[test]
    fn restore_reads_persisted_identity() {
        let mut store = SessionStore::new(MemoryIdentityStore::with_identity(alice()));
        assert!(store.is_loading());

        store.restore();

        assert!(!store.is_loading());
        assert_eq!(store.identity(), Some(&alice()));
    }

    #[test]
    fn restore_without_identity_is_anonymous() {
        let mut store = SessionStore::new(MemoryIdentityStore::default());
        assert_eq!(store.restore(), &Session::Anonymous);
    }

    #[tokio::test]
    async fn login_stores_identity_in_memory_and_storage() {
        let api = FakeApi::new();
        let mut store = SessionStore::new(MemoryIdentityStore::default());
        store.restore();

        let route = store.login(&api, "alice", "secret").await;

        assert_eq!(route, Some(Route::Home));
        assert_eq!(store.identity(), Some(&alice()));
        assert_eq!(store.store().load().unwrap(), Some(alice()));
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn login_failure_keeps_previous_identity_and_shows_detail() {
        let api = FakeApi::new();
        let mut store = SessionStore::new(MemoryIdentityStore::default());
        store.restore();

        let route = store.login(&api, "alice", "wrong").await;

        assert_eq!(route, None);
        assert_eq!(store.session(), &Session::Anonymous);
        assert_eq!(store.store().load().unwrap(), None);
        assert_eq!(store.error(), Some("Invalid credentials"));
    }

    #[test]
    fn login_failure_without_detail_uses_generic_message() {
        let mut store = SessionStore::new(MemoryIdentityStore::with_identity(alice()));
        store.restore();
        store.begin_login();

        let route = store.finish_login(Err(NetworkClientError::TransportError(
            "connection refused".into(),
        )));

        assert_eq!(route, None);
        assert_eq!(store.error(), Some(LOGIN_FAILED));
        assert_eq!(store.identity(), Some(&alice()));
    }

    #[tokio::test]
    async fn logout_clears_identity_even_when_backend_fails() {
        let api = FakeApi::new();
        api.fail_logout();
        let mut store = SessionStore::new(MemoryIdentityStore::with_identity(alice()));
        store.restore();

        let route = store.logout(&api).await;

        assert_eq!(route, Route::Login);
        assert_eq!(store.session(), &Session::Anonymous);
        assert_eq!(store.store().load().unwrap(), None);
        assert_eq!(api.calls(), vec!["logout".to_string()]);
    }
}
