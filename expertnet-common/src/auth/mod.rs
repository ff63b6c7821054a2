use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::models::user::User;
use crate::retry::{self, Cancellation, RetryPolicy};
use crate::session::Session;

pub mod live;
pub mod mock;

pub use live::LiveAuthBackend;
pub use mock::MockAuthBackend;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthGrant {
    pub jwt: String,
    pub user: User,
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, identifier: &str, password: &str) -> Result<AuthGrant, AuthError>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, AuthError>;

    async fn current_user(&self, token: &str) -> Result<User, AuthError>;

    /// The document ID of the consultant profile linked to `user_id`. The backend may
    /// not have indexed a new account yet, in which case this is `Ok(None)`.
    async fn find_consultant_id(
        &self,
        token: &str,
        user_id: u64,
    ) -> Result<Option<String>, AuthError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    Rejected(String),
    InvalidToken,
    Network(String),
    Decode(String),
}

impl AuthError {
    pub fn message(&self) -> String {
        match self {
            AuthError::Rejected(msg) | AuthError::Network(msg) | AuthError::Decode(msg) => {
                msg.clone()
            }
            AuthError::InvalidToken => String::from("Invalid or expired token"),
        }
    }
}

impl std::error::Error for AuthError {}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Rejected(msg) => write!(f, "AuthError: Rejected: {msg}"),
            AuthError::InvalidToken => write!(f, "AuthError: Invalid or expired token"),
            AuthError::Network(msg) => write!(f, "AuthError: Network failure: {msg}"),
            AuthError::Decode(msg) => write!(f, "AuthError: Malformed response: {msg}"),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            AuthError::Decode(error.to_string())
        } else {
            AuthError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        AuthError::Decode(error.to_string())
    }
}

/// Signs users in or up and then waits for the backend to link the account to a
/// consultant profile.
pub struct Authenticator {
    backend: Arc<dyn AuthBackend>,
    consultant_lookup: RetryPolicy,
}

impl Authenticator {
    pub fn new(backend: Arc<dyn AuthBackend>, consultant_lookup: RetryPolicy) -> Self {
        Self {
            backend,
            consultant_lookup,
        }
    }

    pub fn backend(&self) -> &dyn AuthBackend {
        self.backend.as_ref()
    }

    pub fn consultant_lookup(&self) -> RetryPolicy {
        self.consultant_lookup
    }

    pub async fn sign_in(
        &self,
        identifier: &str,
        password: &str,
        cancellation: &Cancellation,
    ) -> Result<Session, AuthError> {
        let grant = self.backend.login(identifier, password).await?;
        log::info!("User {} signed in", grant.user.id);

        Ok(self.bootstrap(grant, self.consultant_lookup, cancellation).await)
    }

    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
        cancellation: &Cancellation,
    ) -> Result<Session, AuthError> {
        let grant = self.backend.register(username, email, password).await?;
        log::info!("User {} registered", grant.user.id);

        Ok(self.bootstrap(grant, self.consultant_lookup, cancellation).await)
    }

    /// Builds a session for a token issued elsewhere. The consultant lookup is tried
    /// once.
    pub async fn session_for_token(&self, token: &str) -> Result<Session, AuthError> {
        let user = self.backend.current_user(token).await?;
        let grant = AuthGrant {
            jwt: String::from(token),
            user,
        };

        let single = RetryPolicy::fixed(1, Duration::ZERO);
        Ok(self.bootstrap(grant, single, &Cancellation::new()).await)
    }

    /// Polls the backend for the consultant linked to `user_id`. Lookup failures count
    /// as empty attempts. Gives `None` when every attempt comes back empty.
    pub async fn resolve_consultant_id(
        &self,
        token: &str,
        user_id: u64,
        cancellation: &Cancellation,
    ) -> Option<String> {
        self.poll_consultant_id(token, user_id, self.consultant_lookup, cancellation)
            .await
    }

    async fn poll_consultant_id(
        &self,
        token: &str,
        user_id: u64,
        policy: RetryPolicy,
        cancellation: &Cancellation,
    ) -> Option<String> {
        let backend = &self.backend;

        retry::poll_until_some(policy, cancellation, |attempt| async move {
            match backend.find_consultant_id(token, user_id).await {
                Ok(id) => id.filter(|id| !id.is_empty()),
                Err(e) => {
                    log::warn!(
                        "Consultant lookup for user {} failed on attempt {}: {}",
                        user_id,
                        attempt,
                        e
                    );
                    None
                }
            }
        })
        .await
    }

    async fn bootstrap(
        &self,
        grant: AuthGrant,
        policy: RetryPolicy,
        cancellation: &Cancellation,
    ) -> Session {
        let consultant_id = self
            .poll_consultant_id(&grant.jwt, grant.user.id, policy, cancellation)
            .await;

        if consultant_id.is_none() {
            log::warn!("No consultant profile found for user {}", grant.user.id);
        }

        Session::new(grant.jwt, grant.user, consultant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::auth::mock::MOCK_TOKEN;

    fn authenticator(backend: MockAuthBackend, attempts: u32) -> (Arc<MockAuthBackend>, Authenticator) {
        let backend = Arc::new(backend);
        let auth = Authenticator::new(
            Arc::clone(&backend) as Arc<dyn AuthBackend>,
            RetryPolicy::fixed(attempts, Duration::from_secs(1)),
        );

        (backend, auth)
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_resolves_consultant() {
        let (backend, auth) = authenticator(MockAuthBackend::new().with_index_lag(2), 5);

        let session = auth
            .sign_in("john.smith", "password", &Cancellation::new())
            .await
            .unwrap();

        assert_eq!(session.token(), Some(MOCK_TOKEN));
        assert_eq!(session.user_id(), Some(1));
        assert_eq!(session.consultant_id.as_deref(), Some("consultant-john-smith"));
        assert_eq!(backend.lookup_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_survives_missing_consultant() {
        let (backend, auth) = authenticator(MockAuthBackend::new().with_index_lag(10), 5);

        let session = auth
            .sign_in("emma.johnson@example.com", "password", &Cancellation::new())
            .await
            .unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.consultant_id, None);
        assert_eq!(backend.lookup_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_rejected() {
        let (backend, auth) = authenticator(MockAuthBackend::new(), 5);

        assert_eq!(
            auth.sign_in("john.smith", "", &Cancellation::new()).await,
            Err(AuthError::Rejected(String::from(mock::INVALID_CREDENTIALS)))
        );
        assert_eq!(
            auth.sign_in("nobody", "password", &Cancellation::new()).await,
            Err(AuthError::Rejected(String::from(mock::INVALID_CREDENTIALS)))
        );
        assert_eq!(backend.lookup_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_up_without_profile() {
        let (backend, auth) = authenticator(MockAuthBackend::new(), 3);

        let session = auth
            .sign_up("new.person", "new.person@example.com", "secret", &Cancellation::new())
            .await
            .unwrap();

        assert_eq!(session.user.as_ref().unwrap().username, "new.person");
        assert!(session.token().unwrap().starts_with("mock-jwt-token-"));
        assert_eq!(session.consultant_id, None);
        assert_eq!(backend.lookup_count(), 3);

        assert_eq!(
            auth.sign_up("new.person", "other@example.com", "secret", &Cancellation::new())
                .await,
            Err(AuthError::Rejected(String::from(mock::ALREADY_TAKEN)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_lookup() {
        let (_, auth) = authenticator(MockAuthBackend::new().with_index_lag(100), 5);

        let cancellation = Cancellation::new();
        cancellation.cancel();

        let session = auth.sign_in("john.smith", "pw", &cancellation).await.unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.consultant_id, None);
    }

    #[tokio::test]
    async fn test_session_for_token() {
        let (backend, auth) = authenticator(MockAuthBackend::new(), 5);

        let session = auth.session_for_token("mock-jwt-token-3").await.unwrap();
        assert_eq!(session.user_id(), Some(3));
        assert_eq!(
            session.consultant_id.as_deref(),
            Some("consultant-carlos-rodriguez")
        );
        assert_eq!(backend.lookup_count(), 1);

        assert_eq!(
            auth.session_for_token("garbage").await,
            Err(AuthError::InvalidToken)
        );
    }
}
