use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cms::{CmsClient, CmsResponse, Envelope};
use crate::friends::{FriendGateway, GatewayError};
use crate::models::friend_request::{FriendRequest, FriendRequestStatus, FriendshipStatus};
use crate::models::user::User;
use crate::session::Session;

/// Name the backend gives errors for a request that has already left `pending`.
pub const INVALID_TRANSITION_ERROR_NAME: &str = "InvalidTransitionError";

#[derive(Clone)]
pub struct LiveFriendGateway {
    cms: CmsClient,
}

#[derive(Deserialize, Serialize)]
struct StatusData {
    status: FriendshipStatus,
}

impl LiveFriendGateway {
    pub fn new(cms: CmsClient) -> Self {
        Self { cms }
    }

    async fn call(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        fallback: &str,
    ) -> Result<CmsResponse, GatewayError> {
        let token = session.token().ok_or(GatewayError::NotAuthenticated)?;

        let mut builder = self.cms.request(method, path, Some(token));
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let resp = CmsResponse::send(builder).await?;

        if resp.is_success() {
            Ok(resp)
        } else {
            let err = rejection_to_error(&resp, fallback);
            log::warn!("{} {} failed: {}", fallback, path, err);
            Err(err)
        }
    }

    async fn update_status(
        &self,
        session: &Session,
        request_id: u64,
        status: FriendRequestStatus,
        fallback: &str,
    ) -> Result<FriendRequest, GatewayError> {
        let resp = self
            .call(
                session,
                Method::PUT,
                &format!("/api/friend-requests/{request_id}"),
                Some(json!({ "data": { "status": status } })),
                fallback,
            )
            .await?;

        Ok(resp.parse::<Envelope<FriendRequest>>()?.data)
    }
}

/// Maps a non-2xx backend response onto a gateway error. `fallback` is used when the
/// backend gives no message of its own.
pub fn rejection_to_error(resp: &CmsResponse, fallback: &str) -> GatewayError {
    let detail = resp.error_detail().unwrap_or_default();
    let message = detail
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| String::from(fallback));

    match resp.status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::NotAuthenticated,
        StatusCode::NOT_FOUND => GatewayError::NotFound(message),
        StatusCode::CONFLICT => GatewayError::AlreadyRequested,
        StatusCode::BAD_REQUEST
            if detail.name.as_deref() == Some(INVALID_TRANSITION_ERROR_NAME) =>
        {
            GatewayError::InvalidTransition(message)
        }
        status => GatewayError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl FriendGateway for LiveFriendGateway {
    async fn send_friend_request(
        &self,
        session: &Session,
        to_user_id: u64,
    ) -> Result<FriendRequest, GatewayError> {
        let resp = self
            .call(
                session,
                Method::POST,
                "/api/friend-requests",
                Some(json!({ "data": { "to": to_user_id } })),
                "Failed to send friend request",
            )
            .await?;

        Ok(resp.parse::<Envelope<FriendRequest>>()?.data)
    }

    async fn accept_friend_request(
        &self,
        session: &Session,
        request_id: u64,
    ) -> Result<FriendRequest, GatewayError> {
        self.update_status(
            session,
            request_id,
            FriendRequestStatus::Accepted,
            "Failed to accept friend request",
        )
        .await
    }

    async fn reject_friend_request(
        &self,
        session: &Session,
        request_id: u64,
    ) -> Result<FriendRequest, GatewayError> {
        self.update_status(
            session,
            request_id,
            FriendRequestStatus::Rejected,
            "Failed to reject friend request",
        )
        .await
    }

    async fn remove_friend(&self, session: &Session, friend_id: u64) -> Result<(), GatewayError> {
        self.call(
            session,
            Method::DELETE,
            &format!("/api/friends/{friend_id}"),
            None,
            "Failed to remove friend",
        )
        .await?;

        Ok(())
    }

    async fn pending_friend_requests(
        &self,
        session: &Session,
    ) -> Result<Vec<FriendRequest>, GatewayError> {
        let resp = self
            .call(
                session,
                Method::GET,
                "/api/friend-requests/pending",
                None,
                "Failed to fetch friend requests",
            )
            .await?;

        Ok(resp.parse::<Envelope<Vec<FriendRequest>>>()?.data)
    }

    async fn sent_friend_requests(
        &self,
        session: &Session,
    ) -> Result<Vec<FriendRequest>, GatewayError> {
        let resp = self
            .call(
                session,
                Method::GET,
                "/api/friend-requests/sent",
                None,
                "Failed to fetch sent requests",
            )
            .await?;

        Ok(resp.parse::<Envelope<Vec<FriendRequest>>>()?.data)
    }

    async fn friends(&self, session: &Session) -> Result<Vec<User>, GatewayError> {
        let resp = self
            .call(
                session,
                Method::GET,
                "/api/friends",
                None,
                "Failed to fetch friends",
            )
            .await?;

        Ok(resp.parse::<Envelope<Vec<User>>>()?.data)
    }

    async fn friendship_status(
        &self,
        session: &Session,
        user_id: u64,
    ) -> Result<FriendshipStatus, GatewayError> {
        let resp = self
            .call(
                session,
                Method::GET,
                &format!("/api/friends/status/{user_id}"),
                None,
                "Failed to check friendship status",
            )
            .await?;

        Ok(resp.parse::<Envelope<StatusData>>()?.data.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    fn response(status: StatusCode, body: &str) -> CmsResponse {
        CmsResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_rejection_to_error() {
        let fallback = "Failed to send friend request";

        assert_eq!(
            rejection_to_error(&response(StatusCode::UNAUTHORIZED, ""), fallback),
            GatewayError::NotAuthenticated
        );
        assert_eq!(
            rejection_to_error(&response(StatusCode::FORBIDDEN, "{}"), fallback),
            GatewayError::NotAuthenticated
        );
        assert_eq!(
            rejection_to_error(
                &response(StatusCode::NOT_FOUND, r#"{"error":{"message":"User not found"}}"#),
                fallback
            ),
            GatewayError::NotFound(String::from("User not found"))
        );
        assert_eq!(
            rejection_to_error(&response(StatusCode::CONFLICT, "{}"), fallback),
            GatewayError::AlreadyRequested
        );
        assert_eq!(
            rejection_to_error(
                &response(
                    StatusCode::BAD_REQUEST,
                    r#"{"error":{"name":"InvalidTransitionError","message":"Request is already accepted"}}"#
                ),
                fallback
            ),
            GatewayError::InvalidTransition(String::from("Request is already accepted"))
        );
        assert_eq!(
            rejection_to_error(
                &response(StatusCode::BAD_REQUEST, r#"{"error":{"name":"ValidationError"}}"#),
                fallback
            ),
            GatewayError::Rejected {
                status: 400,
                message: String::from(fallback)
            }
        );
        assert_eq!(
            rejection_to_error(&response(StatusCode::INTERNAL_SERVER_ERROR, "oops"), fallback),
            GatewayError::Rejected {
                status: 500,
                message: String::from(fallback)
            }
        );
    }

    #[tokio::test]
    async fn test_no_token_is_not_authenticated() {
        // Nothing listens here; the call must fail before any request is made
        let cms = CmsClient::new("http://127.0.0.1:9", Duration::from_millis(50)).unwrap();
        let gateway = LiveFriendGateway::new(cms);

        assert_eq!(
            gateway.friends(&Session::anonymous()).await,
            Err(GatewayError::NotAuthenticated)
        );
        assert_eq!(
            gateway.send_friend_request(&Session::anonymous(), 2).await,
            Err(GatewayError::NotAuthenticated)
        );
    }
}
