use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::friends::{FriendGateway, GatewayError};
use crate::mock_data;
use crate::models::friend_request::{FriendRequest, FriendRequestStatus, FriendshipStatus};
use crate::models::user::User;
use crate::session::Session;

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

pub const SELF_REQUEST_MESSAGE: &str = "Cannot send a friend request to yourself";

struct MockStore {
    users: Vec<User>,
    requests: Vec<FriendRequest>,
    // Keyed by the user whose list it is. Accepting a request only adds to the
    // accepting user's list, so lists are not kept symmetric.
    friends: HashMap<u64, Vec<User>>,
    next_request_id: u64,
}

/// In-process friend gateway with a simulated network delay.
pub struct MockFriendGateway {
    store: Mutex<MockStore>,
    latency: Duration,
}

impl MockFriendGateway {
    /// An empty store over the given users.
    pub fn with_users(users: Vec<User>, latency: Duration) -> Self {
        Self {
            store: Mutex::new(MockStore {
                users,
                requests: Vec::new(),
                friends: HashMap::new(),
                next_request_id: 1,
            }),
            latency,
        }
    }

    /// The mock directory's users: user 1 is friends with users 4 and 5 and has pending
    /// requests from users 2 and 3.
    pub fn seeded(latency: Duration) -> Self {
        let users = mock_data::mock_users();

        let mut requests = Vec::new();
        let mut friends = HashMap::new();

        if users.len() >= 5 {
            requests.push(FriendRequest::pending(1, users[1].clone(), users[0].clone()));
            requests.push(FriendRequest::pending(2, users[2].clone(), users[0].clone()));
            friends.insert(users[0].id, vec![users[3].clone(), users[4].clone()]);
        }

        let next_request_id = requests.len() as u64 + 1;

        Self {
            store: Mutex::new(MockStore {
                users,
                requests,
                friends,
                next_request_id,
            }),
            latency,
        }
    }

    pub fn new() -> Self {
        Self::seeded(DEFAULT_LATENCY)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MockStore>, GatewayError> {
        self.store
            .lock()
            .map_err(|_| GatewayError::Network(String::from("Mock store lock was poisoned")))
    }

    fn transition(
        &self,
        request_id: u64,
        next: FriendRequestStatus,
        session_user: &User,
    ) -> Result<FriendRequest, GatewayError> {
        let mut store = self.lock()?;

        // Only the recipient can act on a request. Anyone else sees it as missing.
        let request = store
            .requests
            .iter_mut()
            .find(|r| r.id == request_id && r.to.id == session_user.id)
            .ok_or_else(|| GatewayError::NotFound(String::from("Friend request not found")))?;

        if !request.status.can_become(next) {
            return Err(GatewayError::InvalidTransition(format!(
                "Friend request is already {}",
                request.status
            )));
        }

        if request.status != next {
            request.status = next;
            request.updated_at = Utc::now();
        }

        let request = request.clone();

        if next == FriendRequestStatus::Accepted {
            let list = store.friends.entry(session_user.id).or_default();
            if !list.iter().any(|f| f.id == request.from.id) {
                list.push(request.from.clone());
            }
        }

        Ok(request)
    }
}

impl Default for MockFriendGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn session_user(session: &Session) -> Result<&User, GatewayError> {
    session.user.as_ref().ok_or(GatewayError::NotAuthenticated)
}

#[async_trait]
impl FriendGateway for MockFriendGateway {
    async fn send_friend_request(
        &self,
        session: &Session,
        to_user_id: u64,
    ) -> Result<FriendRequest, GatewayError> {
        self.delay().await;

        let current = session_user(session)?;

        if to_user_id == current.id {
            return Err(GatewayError::Rejected {
                status: 400,
                message: String::from(SELF_REQUEST_MESSAGE),
            });
        }

        let mut store = self.lock()?;

        let to = store
            .users
            .iter()
            .find(|u| u.id == to_user_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(String::from("User not found")))?;

        if store
            .requests
            .iter()
            .any(|r| r.is_pending_between(current.id, to_user_id))
        {
            return Err(GatewayError::AlreadyRequested);
        }

        let id = store.next_request_id;
        store.next_request_id += 1;

        let request = FriendRequest::pending(id, current.clone(), to);
        store.requests.push(request.clone());

        log::debug!("Mock friend request {} from {} to {}", id, current.id, to_user_id);

        Ok(request)
    }

    async fn accept_friend_request(
        &self,
        session: &Session,
        request_id: u64,
    ) -> Result<FriendRequest, GatewayError> {
        self.delay().await;
        let current = session_user(session)?;
        self.transition(request_id, FriendRequestStatus::Accepted, current)
    }

    async fn reject_friend_request(
        &self,
        session: &Session,
        request_id: u64,
    ) -> Result<FriendRequest, GatewayError> {
        self.delay().await;
        let current = session_user(session)?;
        self.transition(request_id, FriendRequestStatus::Rejected, current)
    }

    async fn remove_friend(&self, session: &Session, friend_id: u64) -> Result<(), GatewayError> {
        self.delay().await;

        let current = session_user(session)?;
        let mut store = self.lock()?;

        if let Some(list) = store.friends.get_mut(&current.id) {
            list.retain(|f| f.id != friend_id);
        }

        Ok(())
    }

    async fn pending_friend_requests(
        &self,
        session: &Session,
    ) -> Result<Vec<FriendRequest>, GatewayError> {
        self.delay().await;

        let current = session_user(session)?;
        let store = self.lock()?;

        Ok(store
            .requests
            .iter()
            .filter(|r| r.status == FriendRequestStatus::Pending && r.to.id == current.id)
            .cloned()
            .collect())
    }

    async fn sent_friend_requests(
        &self,
        session: &Session,
    ) -> Result<Vec<FriendRequest>, GatewayError> {
        self.delay().await;

        let current = session_user(session)?;
        let store = self.lock()?;

        Ok(store
            .requests
            .iter()
            .filter(|r| r.status == FriendRequestStatus::Pending && r.from.id == current.id)
            .cloned()
            .collect())
    }

    async fn friends(&self, session: &Session) -> Result<Vec<User>, GatewayError> {
        self.delay().await;

        let current = session_user(session)?;
        let store = self.lock()?;

        Ok(store.friends.get(&current.id).cloned().unwrap_or_default())
    }

    async fn friendship_status(
        &self,
        session: &Session,
        user_id: u64,
    ) -> Result<FriendshipStatus, GatewayError> {
        self.delay().await;

        let current = session_user(session)?;
        let store = self.lock()?;

        let is_friend = store
            .friends
            .get(&current.id)
            .is_some_and(|list| list.iter().any(|f| f.id == user_id));

        if is_friend {
            return Ok(FriendshipStatus::Friends);
        }

        if store
            .requests
            .iter()
            .any(|r| r.is_pending_between(user_id, current.id))
        {
            return Ok(FriendshipStatus::PendingReceived);
        }

        if store
            .requests
            .iter()
            .any(|r| r.is_pending_between(current.id, user_id))
        {
            return Ok(FriendshipStatus::PendingSent);
        }

        Ok(FriendshipStatus::NotFriends)
    }
}
