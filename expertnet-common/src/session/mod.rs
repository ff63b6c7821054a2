use serde::{Deserialize, Serialize};

use crate::models::user::User;

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};

pub const TOKEN_KEY: &str = "jwt";
pub const USER_KEY: &str = "user";
pub const CONSULTANT_ID_KEY: &str = "consultantId";

/// Who is making a call. Passed into every gateway operation rather than read from
/// shared state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub consultant_id: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(token: String, user: User, consultant_id: Option<String>) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
            consultant_id,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user.as_ref().map(|u| u.id)
    }

    /// Loads whatever session the storage holds. An empty storage gives an anonymous
    /// session.
    pub fn restore(storage: &dyn SessionStorage) -> Result<Self, StorageError> {
        let token = storage.get(TOKEN_KEY)?;

        let user = match storage.get(USER_KEY)? {
            Some(json) => Some(
                serde_json::from_str::<User>(&json)
                    .map_err(|e| StorageError::Corrupt(format!("Stored user: {e}")))?,
            ),
            None => None,
        };

        let consultant_id = storage.get(CONSULTANT_ID_KEY)?;

        Ok(Self {
            token,
            user,
            consultant_id,
        })
    }

    pub fn persist(&self, storage: &dyn SessionStorage) -> Result<(), StorageError> {
        match &self.token {
            Some(token) => storage.set(TOKEN_KEY, token)?,
            None => storage.remove(TOKEN_KEY)?,
        }

        match &self.user {
            Some(user) => {
                let json = serde_json::to_string(user)
                    .map_err(|e| StorageError::Corrupt(format!("Serializing user: {e}")))?;
                storage.set(USER_KEY, &json)?;
            }
            None => storage.remove(USER_KEY)?,
        }

        match &self.consultant_id {
            Some(id) => storage.set(CONSULTANT_ID_KEY, id)?,
            None => storage.remove(CONSULTANT_ID_KEY)?,
        }

        Ok(())
    }

    pub fn clear(storage: &dyn SessionStorage) -> Result<(), StorageError> {
        storage.remove(TOKEN_KEY)?;
        storage.remove(USER_KEY)?;
        storage.remove(CONSULTANT_ID_KEY)?;

        Ok(())
    }
}
