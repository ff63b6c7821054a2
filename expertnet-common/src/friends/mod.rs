use async_trait::async_trait;
use std::fmt;

use crate::models::friend_request::{FriendRequest, FriendshipStatus};
use crate::models::user::User;
use crate::session::Session;

pub mod live;
pub mod mock;

pub use live::LiveFriendGateway;
pub use mock::MockFriendGateway;

/// The friend-relationship operations. The server picks one implementation at startup
/// and every call carries the caller's session explicitly.
#[async_trait]
pub trait FriendGateway: Send + Sync {
    async fn send_friend_request(
        &self,
        session: &Session,
        to_user_id: u64,
    ) -> Result<FriendRequest, GatewayError>;

    async fn accept_friend_request(
        &self,
        session: &Session,
        request_id: u64,
    ) -> Result<FriendRequest, GatewayError>;

    async fn reject_friend_request(
        &self,
        session: &Session,
        request_id: u64,
    ) -> Result<FriendRequest, GatewayError>;

    /// Removing someone who is not a friend succeeds.
    async fn remove_friend(&self, session: &Session, friend_id: u64) -> Result<(), GatewayError>;

    /// Pending requests addressed to the session user.
    async fn pending_friend_requests(
        &self,
        session: &Session,
    ) -> Result<Vec<FriendRequest>, GatewayError>;

    /// Pending requests sent by the session user.
    async fn sent_friend_requests(
        &self,
        session: &Session,
    ) -> Result<Vec<FriendRequest>, GatewayError>;

    async fn friends(&self, session: &Session) -> Result<Vec<User>, GatewayError>;

    async fn friendship_status(
        &self,
        session: &Session,
        user_id: u64,
    ) -> Result<FriendshipStatus, GatewayError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    NotAuthenticated,
    AlreadyRequested,
    NotFound(String),
    InvalidTransition(String),
    Rejected { status: u16, message: String },
    Network(String),
    Decode(String),
}

impl GatewayError {
    /// The message a client should see, without the error-kind prefix.
    pub fn message(&self) -> String {
        match self {
            GatewayError::NotAuthenticated => String::from("User not authenticated"),
            GatewayError::AlreadyRequested => String::from("Friend request already sent"),
            GatewayError::NotFound(msg)
            | GatewayError::InvalidTransition(msg)
            | GatewayError::Network(msg)
            | GatewayError::Decode(msg) => msg.clone(),
            GatewayError::Rejected { message, .. } => message.clone(),
        }
    }
}

impl std::error::Error for GatewayError {}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::NotAuthenticated => write!(f, "GatewayError: User not authenticated"),
            GatewayError::AlreadyRequested => {
                write!(f, "GatewayError: Friend request already sent")
            }
            GatewayError::NotFound(msg) => write!(f, "GatewayError: Not found: {msg}"),
            GatewayError::InvalidTransition(msg) => {
                write!(f, "GatewayError: Invalid transition: {msg}")
            }
            GatewayError::Rejected { status, message } => {
                write!(f, "GatewayError: Backend rejected request ({status}): {message}")
            }
            GatewayError::Network(msg) => write!(f, "GatewayError: Network failure: {msg}"),
            GatewayError::Decode(msg) => write!(f, "GatewayError: Malformed response: {msg}"),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            GatewayError::Decode(error.to_string())
        } else {
            GatewayError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(error: serde_json::Error) -> Self {
        GatewayError::Decode(error.to_string())
    }
}
