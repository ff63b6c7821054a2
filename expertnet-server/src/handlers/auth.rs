use expertnet_common::auth::Authenticator;
use expertnet_common::models::user::User;
use expertnet_common::retry::Cancellation;
use expertnet_common::session::Session;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use zeroize::Zeroizing;

use crate::handlers::error::HttpErrorResponse;
use crate::middleware::session::CurrentSession;
use crate::utils::session_registry::SessionRegistry;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub jwt: String,
    pub user: User,
    pub consultant_id: Option<String>,
}

impl AuthResponse {
    fn from_session(session: Session) -> Result<Self, HttpErrorResponse> {
        match (session.token, session.user) {
            (Some(jwt), Some(user)) => Ok(Self {
                jwt,
                user,
                consultant_id: session.consultant_id,
            }),
            _ => Err(HttpErrorResponse::InternalError(String::from(
                "Sign-in did not produce a session",
            ))),
        }
    }
}

pub async fn login(
    auth: web::Data<Authenticator>,
    sessions: web::Data<SessionRegistry>,
    credentials: web::Json<LoginRequest>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let credentials = credentials.into_inner();
    let password = Zeroizing::new(credentials.password);

    if credentials.identifier.trim().is_empty() || password.is_empty() {
        return Err(HttpErrorResponse::IncorrectlyFormed(String::from(
            "Identifier and password are required",
        )));
    }

    let session = auth
        .sign_in(credentials.identifier.trim(), &password, &Cancellation::new())
        .await?;

    sessions.insert(session.clone()).await?;

    Ok(HttpResponse::Ok().json(AuthResponse::from_session(session)?))
}

pub async fn register(
    auth: web::Data<Authenticator>,
    sessions: web::Data<SessionRegistry>,
    new_user: web::Json<RegisterRequest>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let new_user = new_user.into_inner();
    let password = Zeroizing::new(new_user.password);

    let username = new_user.username.trim();
    let email = new_user.email.trim();

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(HttpErrorResponse::IncorrectlyFormed(String::from(
            "Username, email, and password are required",
        )));
    }

    let session = auth
        .sign_up(username, email, &password, &Cancellation::new())
        .await?;

    sessions.insert(session.clone()).await?;

    Ok(HttpResponse::Ok().json(AuthResponse::from_session(session)?))
}

pub async fn logout(
    sessions: web::Data<SessionRegistry>,
    session: CurrentSession,
) -> Result<HttpResponse, HttpErrorResponse> {
    sessions.remove(session.token()).await?;

    if let Some(user_id) = session.0.user_id() {
        log::info!("User {user_id} signed out");
    }

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub async fn current_session(session: CurrentSession) -> HttpResponse {
    HttpResponse::Ok().json(session.0)
}

/// The signed-in user, shaped like the CMS's own `users/me` so a live deployment can
/// point at this server.
pub async fn current_user(session: CurrentSession) -> Result<HttpResponse, HttpErrorResponse> {
    match session.0.user {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(HttpErrorResponse::BadToken(String::from(
            "Invalid or expired token",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use expertnet_common::auth::mock::{ALREADY_TAKEN, INVALID_CREDENTIALS};
    use expertnet_common::retry::RetryPolicy;

    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use std::time::Duration;

    use crate::handlers::test_utils::{init_app, mock_state, read_json};
    use crate::state::AppState;
    use crate::utils::session_registry::SessionSettings;

    #[actix_web::test]
    async fn test_login() {
        let state = mock_state();
        let app = init_app!(state);

        let req = TestRequest::post()
            .uri("/api/auth/local")
            .set_json(json!({ "identifier": "emma.johnson@example.com", "password": "pw" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_json(resp).await;
        assert_eq!(body["jwt"], "mock-jwt-token-2");
        assert_eq!(body["user"]["id"], 2);
        assert_eq!(body["consultantId"], "consultant-emma-johnson");

        // The new token is usable straight away
        let req = TestRequest::get()
            .uri("/api/auth/session")
            .insert_header(("Authorization", "Bearer mock-jwt-token-2"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_json(resp).await;
        assert_eq!(body["user"]["username"], "emma.johnson");
        assert_eq!(body["token"], "mock-jwt-token-2");
    }

    #[actix_web::test]
    async fn test_login_rejected() {
        let state = mock_state();
        let app = init_app!(state);

        let req = TestRequest::post()
            .uri("/api/auth/local")
            .set_json(json!({ "identifier": "nobody@example.com", "password": "pw" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = read_json(resp).await;
        assert_eq!(body["error"]["message"], INVALID_CREDENTIALS);

        let req = TestRequest::post()
            .uri("/api/auth/local")
            .set_json(json!({ "identifier": "john.smith", "password": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = read_json(resp).await;
        assert_eq!(body["error"]["name"], "ValidationError");

        let req = TestRequest::post()
            .uri("/api/auth/local")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_register() {
        let state = AppState::mock(
            Duration::ZERO,
            RetryPolicy::fixed(1, Duration::ZERO),
            SessionSettings::default(),
        );
        let app = init_app!(state);

        let req = TestRequest::post()
            .uri("/api/auth/local/register")
            .set_json(json!({
                "username": "new.person",
                "email": "new.person@example.com",
                "password": "hunter22",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_json(resp).await;
        assert_eq!(body["user"]["username"], "new.person");
        assert!(body["consultantId"].is_null());

        let token = body["jwt"].as_str().unwrap().to_owned();

        let req = TestRequest::get()
            .uri("/api/users/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await["email"], "new.person@example.com");

        let req = TestRequest::post()
            .uri("/api/auth/local/register")
            .set_json(json!({
                "username": "other",
                "email": "new.person@example.com",
                "password": "hunter22",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(resp).await["error"]["message"], ALREADY_TAKEN);

        let req = TestRequest::post()
            .uri("/api/auth/local/register")
            .set_json(json!({ "username": "x", "password": "y" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_logout() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::mock(
            Duration::ZERO,
            RetryPolicy::fixed(1, Duration::ZERO),
            SessionSettings {
                dir: Some(dir.path().to_path_buf()),
                ..Default::default()
            },
        );
        let app = init_app!(state);

        let req = TestRequest::post()
            .uri("/api/auth/local")
            .set_json(json!({ "identifier": "aiko.tanaka", "password": "pw" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        let req = TestRequest::post()
            .uri("/api/auth/logout")
            .insert_header(("Authorization", "Bearer mock-jwt-token-4"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await["success"], true);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let req = TestRequest::post().uri("/api/auth/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // The signed-out token is refused from now on and nothing is written back
        for uri in ["/api/friends", "/api/auth/session"] {
            let req = TestRequest::get()
                .uri(uri)
                .insert_header(("Authorization", "Bearer mock-jwt-token-4"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        // Signing in again issues a usable session
        let req = TestRequest::post()
            .uri("/api/auth/local")
            .set_json(json!({ "identifier": "aiko.tanaka", "password": "pw" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::get()
            .uri("/api/friends")
            .insert_header(("Authorization", "Bearer mock-jwt-token-4"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_logout_of_default_session() {
        let state = mock_state();
        let app = init_app!(state);

        let req = TestRequest::post()
            .uri("/api/auth/logout")
            .insert_header(("Authorization", "Bearer mock-jwt-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::get()
            .uri("/api/friends")
            .insert_header(("Authorization", "Bearer mock-jwt-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
