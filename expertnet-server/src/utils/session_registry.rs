use expertnet_common::auth::{AuthError, Authenticator};
use expertnet_common::session::{FileStorage, Session, StorageError};

use actix_web::web;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

pub const DEFAULT_REVALIDATE_AFTER: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
pub struct SessionSettings {
    /// Where signed-in sessions are mirrored, one file per token.
    pub dir: Option<PathBuf>,
    /// How long a cached session is trusted before the auth backend is asked again.
    pub revalidate_after: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            dir: None,
            revalidate_after: DEFAULT_REVALIDATE_AFTER,
        }
    }
}

struct Entry {
    session: Session,
    checked_at: Instant,
}

impl Entry {
    fn new(session: Session) -> Self {
        Self {
            session,
            checked_at: Instant::now(),
        }
    }
}

/// Maps bearer tokens to sessions. Sessions created by signing in are mirrored to one
/// file per token when a directory is configured, so they survive restarts. Tokens
/// that were signed out stay rejected for the life of the process.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Entry>>,
    revoked: RwLock<HashSet<String>>,
    settings: SessionSettings,
    verifier: Option<Arc<Authenticator>>,
}

/// Session files are named by the SHA-256 of the token so tokens never hit the disk in
/// file names.
pub fn session_file_name(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());

    let mut name = String::with_capacity(digest.len() * 2 + 5);
    for byte in digest {
        let _ = write!(name, "{byte:02x}");
    }
    name.push_str(".json");

    name
}

fn storage_for(dir: &Path, token: &str) -> FileStorage {
    FileStorage::new(dir.join(session_file_name(token)))
}

fn blocking_error(e: actix_web::error::BlockingError) -> StorageError {
    StorageError::Io(std::io::Error::other(e.to_string()))
}

impl SessionRegistry {
    pub fn new(settings: SessionSettings, verifier: Option<Arc<Authenticator>>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            revoked: RwLock::new(HashSet::new()),
            settings,
            verifier,
        }
    }

    /// A registry that already knows `session`. It is kept in memory only.
    pub fn with_session(
        settings: SessionSettings,
        verifier: Option<Arc<Authenticator>>,
        session: Session,
    ) -> Self {
        let mut sessions = HashMap::new();
        if let Some(token) = session.token.clone() {
            sessions.insert(token, Entry::new(session));
        }

        Self {
            sessions: RwLock::new(sessions),
            revoked: RwLock::new(HashSet::new()),
            settings,
            verifier,
        }
    }

    /// Registers a session that was just created by signing in or registering, and
    /// persists it when a session directory is configured.
    pub async fn insert(&self, session: Session) -> Result<(), StorageError> {
        let Some(token) = session.token.clone() else {
            return Ok(());
        };

        if let Some(dir) = &self.settings.dir {
            let storage = storage_for(dir, &token);
            let to_persist = session.clone();

            web::block(move || to_persist.persist(&storage))
                .await
                .map_err(blocking_error)??;
        }

        self.revoked.write().await.remove(&token);
        self.sessions.write().await.insert(token, Entry::new(session));
        Ok(())
    }

    /// Finds the session for `token`: first in memory, then on disk, then by asking the
    /// auth backend. `Ok(None)` means the token is not valid.
    pub async fn resolve(&self, token: &str) -> Result<Option<Session>, AuthError> {
        if self.revoked.read().await.contains(token) {
            return Ok(None);
        }

        let cached = self.sessions.read().await.get(token).map(|entry| {
            let fresh = entry.checked_at.elapsed() < self.settings.revalidate_after;
            (entry.session.clone(), fresh)
        });

        if let Some((session, fresh)) = cached {
            if fresh || self.verifier.is_none() {
                return Ok(Some(session));
            }

            return self.revalidate(token, session).await;
        }

        if let Some(session) = self.restore(token).await {
            if self.verifier.is_none() {
                self.remember(token, session.clone()).await;
                return Ok(Some(session));
            }

            // The file may be older than the token's lifetime
            return self.revalidate(token, session).await;
        }

        let Some(verifier) = &self.verifier else {
            return Ok(None);
        };

        let session = match verifier.session_for_token(token).await {
            Ok(s) => s,
            Err(AuthError::InvalidToken) => return Ok(None),
            Err(e) => return Err(e),
        };

        // Verified tokens are cached but never written to disk
        self.remember(token, session.clone()).await;

        Ok(Some(session))
    }

    /// Signs `token` out. Later lookups of the token fail even if the auth backend would
    /// still accept it.
    pub async fn remove(&self, token: &str) -> Result<(), StorageError> {
        self.revoked.write().await.insert(String::from(token));
        self.forget(token).await
    }

    async fn remember(&self, token: &str, session: Session) {
        self.sessions
            .write()
            .await
            .insert(String::from(token), Entry::new(session));
    }

    async fn forget(&self, token: &str) -> Result<(), StorageError> {
        self.sessions.write().await.remove(token);

        if let Some(dir) = &self.settings.dir {
            let storage = storage_for(dir, token);

            web::block(move || Session::clear(&storage))
                .await
                .map_err(blocking_error)??;
        }

        Ok(())
    }

    /// Asks the auth backend whether a cached session's token is still good. A backend
    /// that cannot be reached leaves the cached session in place.
    async fn revalidate(
        &self,
        token: &str,
        mut session: Session,
    ) -> Result<Option<Session>, AuthError> {
        let Some(verifier) = &self.verifier else {
            return Ok(Some(session));
        };

        match verifier.backend().current_user(token).await {
            Ok(user) => {
                session.user = Some(user);
                self.remember(token, session.clone()).await;
                Ok(Some(session))
            }
            Err(AuthError::InvalidToken) => {
                log::info!("Dropping session whose token is no longer accepted");

                if let Err(e) = self.forget(token).await {
                    log::error!("Failed to clear expired session: {e}");
                }

                Ok(None)
            }
            Err(e) => {
                log::warn!("Could not revalidate session, keeping cached copy: {e}");
                Ok(Some(session))
            }
        }
    }

    async fn restore(&self, token: &str) -> Option<Session> {
        let dir = self.settings.dir.as_ref()?;
        let storage = storage_for(dir, token);

        let restored = match web::block(move || Session::restore(&storage)).await {
            Ok(Ok(s)) => s,
            Ok(Err(e)) => {
                log::warn!("Ignoring unreadable session file: {e}");
                return None;
            }
            Err(e) => {
                log::error!("Session restore failed: {e}");
                return None;
            }
        };

        // A file left behind for a different token is not this session
        if restored.token() == Some(token) && restored.is_authenticated() {
            Some(restored)
        } else {
            None
        }
    }
}
