use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};
use zeroize::Zeroizing;

use crate::auth::{AuthBackend, AuthError, AuthGrant};
use crate::mock_data;
use crate::models::user::User;
use crate::session::Session;
use crate::validators::{self, Validity};

/// Token issued to the first mock user.
pub const MOCK_TOKEN: &str = "mock-jwt-token";

pub const INVALID_CREDENTIALS: &str = "Invalid identifier or password";
pub const ALREADY_TAKEN: &str = "Email or Username are already taken";

struct MockAccount {
    user: User,
    // Seeded accounts accept any non-empty password
    password: Option<Zeroizing<String>>,
}

pub struct MockAuthBackend {
    accounts: Mutex<Vec<MockAccount>>,
    index_lag: u32,
    lookups: AtomicU32,
}

pub fn token_for(user_id: u64) -> String {
    if user_id == 1 {
        String::from(MOCK_TOKEN)
    } else {
        format!("{MOCK_TOKEN}-{user_id}")
    }
}

fn user_id_from_token(token: &str) -> Option<u64> {
    if token == MOCK_TOKEN {
        return Some(1);
    }

    token
        .strip_prefix(MOCK_TOKEN)?
        .strip_prefix('-')?
        .parse()
        .ok()
}

impl MockAuthBackend {
    pub fn new() -> Self {
        let accounts = mock_data::mock_users()
            .into_iter()
            .map(|user| MockAccount {
                user,
                password: None,
            })
            .collect();

        Self {
            accounts: Mutex::new(accounts),
            index_lag: 0,
            lookups: AtomicU32::new(0),
        }
    }

    /// Makes the first `lookups` consultant lookups come back empty, the way a backend
    /// that has not yet indexed a profile behaves.
    pub fn with_index_lag(mut self, lookups: u32) -> Self {
        self.index_lag = lookups;
        self
    }

    pub fn lookup_count(&self) -> u32 {
        self.lookups.load(Ordering::SeqCst)
    }

    /// The session of the first mock user, as if they had just signed in.
    pub fn default_session() -> Session {
        let user = mock_data::mock_users()
            .into_iter()
            .next()
            .unwrap_or_else(|| User::new(1, "john.smith", "john.smith@example.com"));
        let consultant_id = user.document_id.clone();

        Session::new(String::from(MOCK_TOKEN), user, consultant_id)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<MockAccount>>, AuthError> {
        self.accounts
            .lock()
            .map_err(|_| AuthError::Network(String::from("Mock account lock was poisoned")))
    }

    fn user_for_token(&self, token: &str) -> Result<User, AuthError> {
        let user_id = user_id_from_token(token).ok_or(AuthError::InvalidToken)?;

        self.lock()?
            .iter()
            .find(|a| a.user.id == user_id)
            .map(|a| a.user.clone())
            .ok_or(AuthError::InvalidToken)
    }
}

impl Default for MockAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn login(&self, identifier: &str, password: &str) -> Result<AuthGrant, AuthError> {
        if identifier.is_empty() || password.is_empty() {
            return Err(AuthError::Rejected(String::from(INVALID_CREDENTIALS)));
        }

        let accounts = self.lock()?;

        let account = accounts
            .iter()
            .find(|a| {
                a.user.username.eq_ignore_ascii_case(identifier)
                    || a.user.email.eq_ignore_ascii_case(identifier)
            })
            .ok_or_else(|| AuthError::Rejected(String::from(INVALID_CREDENTIALS)))?;

        if let Some(expected) = &account.password {
            if expected.as_str() != password {
                return Err(AuthError::Rejected(String::from(INVALID_CREDENTIALS)));
            }
        }

        Ok(AuthGrant {
            jwt: token_for(account.user.id),
            user: account.user.clone(),
        })
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, AuthError> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::Rejected(String::from("Registration failed")));
        }

        if let Validity::Invalid(msg) = validators::validate_email_address(email) {
            return Err(AuthError::Rejected(msg));
        }

        let mut accounts = self.lock()?;

        if accounts.iter().any(|a| {
            a.user.username.eq_ignore_ascii_case(username)
                || a.user.email.eq_ignore_ascii_case(email)
        }) {
            return Err(AuthError::Rejected(String::from(ALREADY_TAKEN)));
        }

        let id = accounts.iter().map(|a| a.user.id).max().unwrap_or(0) + 1;
        let user = User::new(id, username, email);

        accounts.push(MockAccount {
            user: user.clone(),
            password: Some(Zeroizing::new(String::from(password))),
        });

        Ok(AuthGrant {
            jwt: token_for(id),
            user,
        })
    }

    async fn current_user(&self, token: &str) -> Result<User, AuthError> {
        self.user_for_token(token)
    }

    async fn find_consultant_id(
        &self,
        token: &str,
        user_id: u64,
    ) -> Result<Option<String>, AuthError> {
        self.user_for_token(token)?;

        let lookup = self.lookups.fetch_add(1, Ordering::SeqCst) + 1;
        if lookup <= self.index_lag {
            return Ok(None);
        }

        Ok(self
            .lock()?
            .iter()
            .find(|a| a.user.id == user_id)
            .and_then(|a| a.user.document_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(token_for(1), "mock-jwt-token");
        assert_eq!(token_for(12), "mock-jwt-token-12");

        assert_eq!(user_id_from_token("mock-jwt-token"), Some(1));
        assert_eq!(user_id_from_token("mock-jwt-token-12"), Some(12));
        assert_eq!(user_id_from_token("mock-jwt-token12"), None);
        assert_eq!(user_id_from_token("mock-jwt-token-x"), None);
        assert_eq!(user_id_from_token("other"), None);
    }

    #[tokio::test]
    async fn test_login_by_username_or_email() {
        let backend = MockAuthBackend::new();

        let grant = backend.login("Emma.Johnson", "pw").await.unwrap();
        assert_eq!(grant.user.id, 2);
        assert_eq!(grant.jwt, "mock-jwt-token-2");

        let grant = backend.login("john.smith@example.com", "pw").await.unwrap();
        assert_eq!(grant.jwt, MOCK_TOKEN);
    }

    #[tokio::test]
    async fn test_registered_password_is_checked() {
        let backend = MockAuthBackend::new();

        backend
            .register("sam", "sam@example.com", "correct horse")
            .await
            .unwrap();

        assert!(backend.login("sam", "correct horse").await.is_ok());
        assert_eq!(
            backend.login("sam", "wrong").await,
            Err(AuthError::Rejected(String::from(INVALID_CREDENTIALS)))
        );
    }

    #[tokio::test]
    async fn test_register_validation() {
        let backend = MockAuthBackend::new();

        assert!(matches!(
            backend.register("sam", "not-an-email", "pw").await,
            Err(AuthError::Rejected(_))
        ));
        assert_eq!(
            backend.register("sam", "JOHN.SMITH@example.com", "pw").await,
            Err(AuthError::Rejected(String::from(ALREADY_TAKEN)))
        );
        assert_eq!(
            backend.register("", "sam@example.com", "pw").await,
            Err(AuthError::Rejected(String::from("Registration failed")))
        );
    }

    #[tokio::test]
    async fn test_find_consultant_id_requires_valid_token() {
        let backend = MockAuthBackend::new();

        assert_eq!(
            backend.find_consultant_id("nope", 1).await,
            Err(AuthError::InvalidToken)
        );
        assert_eq!(backend.lookup_count(), 0);

        assert_eq!(
            backend.find_consultant_id(MOCK_TOKEN, 1).await.unwrap().as_deref(),
            Some("consultant-john-smith")
        );
    }

    #[test]
    fn test_default_session() {
        let session = MockAuthBackend::default_session();

        assert_eq!(session.token(), Some(MOCK_TOKEN));
        assert_eq!(session.user_id(), Some(1));
        assert_eq!(session.consultant_id.as_deref(), Some("consultant-john-smith"));
    }
}
