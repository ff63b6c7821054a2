use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::user::User;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl FriendRequestStatus {
    /// A request only ever leaves `Pending`. Repeating the transition a request has
    /// already made is allowed so that accept and reject are idempotent.
    pub fn can_become(self, next: FriendRequestStatus) -> bool {
        self == next || self == FriendRequestStatus::Pending
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FriendRequestStatus::Pending => "pending",
            FriendRequestStatus::Accepted => "accepted",
            FriendRequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for FriendRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub id: u64,
    pub from: User,
    pub to: User,
    pub status: FriendRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FriendRequest {
    pub fn pending(id: u64, from: User, to: User) -> Self {
        let now = Utc::now();

        Self {
            id,
            from,
            to,
            status: FriendRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending_between(&self, from_user_id: u64, to_user_id: u64) -> bool {
        self.status == FriendRequestStatus::Pending
            && self.from.id == from_user_id
            && self.to.id == to_user_id
    }
}

/// How the current user relates to another user. Mutually exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipStatus {
    Friends,
    PendingSent,
    PendingReceived,
    NotFriends,
}
