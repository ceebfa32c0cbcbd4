//! Session interceptor for protected catalog calls.
//!
//! Every protected call goes through [`SessionGuard`]. It attaches the stored
//! token, and when the backend answers 401 it invalidates the session in
//! the [`AppStore`]. Subscribers of the store then see `has_session == false`
//! and route to the login page.

use std::fmt;
use std::future::Future;

use snakedex_types::SnakeRecord;

use crate::api::{ApiError, CatalogClient};
use crate::store::AppStore;

/// Failure of a protected call.
#[derive(Debug, Clone)]
pub enum SessionError {
    /// No token stored; nothing was sent.
    NoSession,
    /// The backend rejected the token; the session has been cleared.
    Expired,
    /// Any other API failure. The session is untouched.
    Api(ApiError),
}

impl SessionError {
    /// True when the caller should send the user to the login page.
    pub fn requires_login(&self) -> bool {
        matches!(self, SessionError::NoSession | SessionError::Expired)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoSession => write!(f, "not logged in"),
            SessionError::Expired => write!(f, "session expired"),
            SessionError::Api(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Api(e) => Some(e),
            _ => None,
        }
    }
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Wraps a [`CatalogClient`] with session handling.
#[derive(Clone)]
pub struct SessionGuard {
    client: CatalogClient,
    store: AppStore,
}

impl SessionGuard {
    pub fn new(client: CatalogClient, store: AppStore) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    /// Runs `call` with the stored token.
    ///
    /// Unauthorized results clear the session before returning
    /// [`SessionError::Expired`].
    pub async fn run<T, F, Fut>(&self, call: F) -> SessionResult<T>
    where
        F: FnOnce(CatalogClient, String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let token = match self.store.session_token() {
            Ok(Some(token)) => token,
            Ok(None) => return Err(SessionError::NoSession),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "failed to read session slot");
                return Err(SessionError::NoSession);
            }
        };

        match call(self.client.clone(), token).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_unauthorized() => {
                tracing::warn!(status = ?e.status, "protected call rejected; invalidating session");
                self.invalidate();
                Err(SessionError::Expired)
            }
            Err(e) => Err(SessionError::Api(e)),
        }
    }

    /// Clears the stored token and notifies store subscribers.
    pub fn invalidate(&self) {
        if let Err(e) = self.store.clear_session() {
            tracing::error!(error = %format!("{e:#}"), "failed to clear session");
        }
    }

    pub async fn list_snakes(&self) -> SessionResult<Vec<SnakeRecord>> {
        self.run(|client, token| async move { client.list_snakes(&token).await })
            .await
    }

    /// Creates `record`, or updates the record currently stored under
    /// `original_binomial`.
    pub async fn save_snake(
        &self,
        original_binomial: Option<String>,
        record: SnakeRecord,
    ) -> SessionResult<()> {
        self.run(|client, token| async move {
            match original_binomial {
                Some(binomial) => client.update_snake(&token, &binomial, &record).await,
                None => client.create_snake(&token, &record).await,
            }
        })
        .await
    }

    pub async fn delete_snake(&self, binomial: String) -> SessionResult<()> {
        self.run(|client, token| async move { client.delete_snake(&token, &binomial).await })
            .await
    }
}
