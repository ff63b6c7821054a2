use expertnet_common::friends::FriendGateway;
use expertnet_common::models::friend_request::FriendRequestStatus;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::handlers::error::HttpErrorResponse;
use crate::handlers::DataResponse;
use crate::middleware::session::CurrentSession;

#[derive(Deserialize)]
pub struct DataBody<T> {
    pub data: T,
}

#[derive(Deserialize)]
pub struct NewFriendRequest {
    pub to: u64,
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: FriendRequestStatus,
}

pub async fn send_request(
    friends: web::Data<dyn FriendGateway>,
    session: CurrentSession,
    body: web::Json<DataBody<NewFriendRequest>>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let request = friends
        .send_friend_request(&session.0, body.data.to)
        .await?;

    Ok(HttpResponse::Created().json(DataResponse::new(request)))
}

pub async fn update_request(
    friends: web::Data<dyn FriendGateway>,
    session: CurrentSession,
    request_id: web::Path<u64>,
    body: web::Json<DataBody<StatusUpdate>>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let request_id = request_id.into_inner();

    let request = match body.data.status {
        FriendRequestStatus::Accepted => {
            friends
                .accept_friend_request(&session.0, request_id)
                .await?
        }
        FriendRequestStatus::Rejected => {
            friends
                .reject_friend_request(&session.0, request_id)
                .await?
        }
        FriendRequestStatus::Pending => {
            return Err(HttpErrorResponse::IncorrectlyFormed(String::from(
                "Status must be accepted or rejected",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(DataResponse::new(request)))
}

pub async fn pending_requests(
    friends: web::Data<dyn FriendGateway>,
    session: CurrentSession,
) -> Result<HttpResponse, HttpErrorResponse> {
    let requests = friends.pending_friend_requests(&session.0).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(requests)))
}

pub async fn sent_requests(
    friends: web::Data<dyn FriendGateway>,
    session: CurrentSession,
) -> Result<HttpResponse, HttpErrorResponse> {
    let requests = friends.sent_friend_requests(&session.0).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(requests)))
}

pub async fn list(
    friends: web::Data<dyn FriendGateway>,
    session: CurrentSession,
) -> Result<HttpResponse, HttpErrorResponse> {
    let users = friends.friends(&session.0).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(users)))
}

pub async fn remove(
    friends: web::Data<dyn FriendGateway>,
    session: CurrentSession,
    friend_id: web::Path<u64>,
) -> Result<HttpResponse, HttpErrorResponse> {
    friends
        .remove_friend(&session.0, friend_id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "data": null })))
}

pub async fn status(
    friends: web::Data<dyn FriendGateway>,
    session: CurrentSession,
    user_id: web::Path<u64>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let status = friends
        .friendship_status(&session.0, user_id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(DataResponse::new(json!({ "status": status }))))
}
