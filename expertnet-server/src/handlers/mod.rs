pub mod auth;
pub mod contact;
pub mod directory;
pub mod feed;
pub mod friends;
pub mod health;
pub mod knowledge;

use serde::Serialize;

/// The `{ data: ... }` wrapper every successful JSON response uses.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Splits a comma separated query value, dropping blank entries.
pub fn comma_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub mod error {
    use expertnet_common::auth::AuthError;
    use expertnet_common::directory::DirectoryError;
    use expertnet_common::friends::GatewayError;
    use expertnet_common::session::StorageError;

    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, HttpResponseBuilder};
    use serde_json::json;
    use std::fmt;

    #[derive(Debug)]
    pub enum HttpErrorResponse {
        // 400
        IncorrectlyFormed(String),
        InvalidState(String),
        Rejected(String),

        // 401
        TokenMissing(String),
        BadToken(String),

        // 404
        DoesNotExist(String),

        // 409
        ConflictWithExisting(String),

        // Status passed through from the backend
        UpstreamRejected(u16, String),

        // 502
        UpstreamUnavailable(String),

        // 500
        InternalError(String),
    }

    impl HttpErrorResponse {
        /// Error name in the body, matching what the CMS uses for the same status.
        pub fn name(&self) -> &'static str {
            match self {
                HttpErrorResponse::IncorrectlyFormed(_) => "ValidationError",
                HttpErrorResponse::InvalidState(_) => "InvalidTransitionError",
                HttpErrorResponse::Rejected(_) | HttpErrorResponse::UpstreamRejected(_, _) => {
                    "ApplicationError"
                }
                HttpErrorResponse::TokenMissing(_) | HttpErrorResponse::BadToken(_) => {
                    "UnauthorizedError"
                }
                HttpErrorResponse::DoesNotExist(_) => "NotFoundError",
                HttpErrorResponse::ConflictWithExisting(_) => "ConflictError",
                HttpErrorResponse::UpstreamUnavailable(_) => "BadGatewayError",
                HttpErrorResponse::InternalError(_) => "InternalServerError",
            }
        }

        pub fn message(&self) -> &str {
            match self {
                HttpErrorResponse::IncorrectlyFormed(msg)
                | HttpErrorResponse::InvalidState(msg)
                | HttpErrorResponse::Rejected(msg)
                | HttpErrorResponse::TokenMissing(msg)
                | HttpErrorResponse::BadToken(msg)
                | HttpErrorResponse::DoesNotExist(msg)
                | HttpErrorResponse::ConflictWithExisting(msg)
                | HttpErrorResponse::UpstreamRejected(_, msg)
                | HttpErrorResponse::UpstreamUnavailable(msg)
                | HttpErrorResponse::InternalError(msg) => msg,
            }
        }
    }

    impl std::error::Error for HttpErrorResponse {}

    impl fmt::Display for HttpErrorResponse {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            use actix_web::ResponseError;
            write!(f, "{} ({}): {}", self.name(), self.status_code(), self.message())
        }
    }

    impl actix_web::error::ResponseError for HttpErrorResponse {
        fn error_response(&self) -> HttpResponse {
            let status = self.status_code();

            HttpResponseBuilder::new(status).json(json!({
                "data": null,
                "error": {
                    "status": status.as_u16(),
                    "name": self.name(),
                    "message": self.message(),
                }
            }))
        }

        fn status_code(&self) -> StatusCode {
            match *self {
                HttpErrorResponse::IncorrectlyFormed(_)
                | HttpErrorResponse::InvalidState(_)
                | HttpErrorResponse::Rejected(_) => StatusCode::BAD_REQUEST,
                HttpErrorResponse::TokenMissing(_) | HttpErrorResponse::BadToken(_) => {
                    StatusCode::UNAUTHORIZED
                }
                HttpErrorResponse::DoesNotExist(_) => StatusCode::NOT_FOUND,
                HttpErrorResponse::ConflictWithExisting(_) => StatusCode::CONFLICT,
                HttpErrorResponse::UpstreamRejected(status, _) => {
                    match StatusCode::from_u16(status) {
                        Ok(s) if s.is_client_error() || s.is_server_error() => s,
                        _ => StatusCode::BAD_GATEWAY,
                    }
                }
                HttpErrorResponse::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
                HttpErrorResponse::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl From<GatewayError> for HttpErrorResponse {
        fn from(err: GatewayError) -> Self {
            match err {
                GatewayError::NotAuthenticated => {
                    HttpErrorResponse::BadToken(String::from("User not authenticated"))
                }
                GatewayError::AlreadyRequested => HttpErrorResponse::ConflictWithExisting(
                    String::from("Friend request already sent"),
                ),
                GatewayError::NotFound(msg) => HttpErrorResponse::DoesNotExist(msg),
                GatewayError::InvalidTransition(msg) => HttpErrorResponse::InvalidState(msg),
                GatewayError::Rejected { status, message } => {
                    HttpErrorResponse::UpstreamRejected(status, message)
                }
                GatewayError::Network(msg) | GatewayError::Decode(msg) => {
                    log::error!("Friend backend failure: {msg}");
                    HttpErrorResponse::UpstreamUnavailable(String::from(
                        "Friend service is unavailable",
                    ))
                }
            }
        }
    }

    impl From<AuthError> for HttpErrorResponse {
        fn from(err: AuthError) -> Self {
            match err {
                AuthError::Rejected(msg) => HttpErrorResponse::Rejected(msg),
                AuthError::InvalidToken => {
                    HttpErrorResponse::BadToken(String::from("Invalid or expired token"))
                }
                AuthError::Network(msg) | AuthError::Decode(msg) => {
                    log::error!("Auth backend failure: {msg}");
                    HttpErrorResponse::UpstreamUnavailable(String::from(
                        "Authentication service is unavailable",
                    ))
                }
            }
        }
    }

    impl From<DirectoryError> for HttpErrorResponse {
        fn from(err: DirectoryError) -> Self {
            match err {
                DirectoryError::NotFound(what) => {
                    HttpErrorResponse::DoesNotExist(format!("{what} not found"))
                }
                DirectoryError::Backend { status, message } => {
                    HttpErrorResponse::UpstreamRejected(status, message)
                }
                DirectoryError::Network(msg) | DirectoryError::Decode(msg) => {
                    log::error!("Directory backend failure: {msg}");
                    HttpErrorResponse::UpstreamUnavailable(String::from(
                        "Directory service is unavailable",
                    ))
                }
            }
        }
    }

    impl From<StorageError> for HttpErrorResponse {
        fn from(err: StorageError) -> Self {
            log::error!("{err}");
            HttpErrorResponse::InternalError(String::from("Failed to save session"))
        }
    }

}

#[cfg(test)]
pub mod test_utils {
    use expertnet_common::retry::RetryPolicy;

    use actix_web::body::MessageBody;
    use actix_web::dev::ServiceResponse;
    use actix_web::test;
    use std::time::Duration;

    use crate::state::AppState;
    use crate::utils::session_registry::SessionSettings;

    pub fn mock_state() -> AppState {
        AppState::mock(
            Duration::ZERO,
            RetryPolicy::fixed(2, Duration::ZERO),
            SessionSettings::default(),
        )
    }

    macro_rules! init_app {
        ($state:expr) => {
            actix_web::test::init_service(
                actix_web::App::new()
                    .configure(|cfg| $state.configure(cfg))
                    .configure(crate::services::api::configure),
            )
            .await
        };
    }

    pub(crate) use init_app;

    pub async fn read_json<B: MessageBody>(resp: ServiceResponse<B>) -> serde_json::Value {
        let body = test::read_body(resp).await;
        serde_json::from_slice(&body).unwrap()
    }
}
