use expertnet_common::session::Session;

use actix_web::dev::Payload;
use actix_web::web::Data;
use actix_web::{FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::handlers::error::HttpErrorResponse;
use crate::middleware::bearer_token;
use crate::utils::session_registry::SessionRegistry;

/// The session belonging to the request's bearer token. Rejects the request with 401 if
/// the token is missing or unknown.
#[derive(Debug)]
pub struct CurrentSession(pub Session);

impl CurrentSession {
    pub fn token(&self) -> &str {
        self.0.token().unwrap_or_default()
    }
}

impl FromRequest for CurrentSession {
    type Error = HttpErrorResponse;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req).map(String::from);
        let registry = req.app_data::<Data<SessionRegistry>>().cloned();

        Box::pin(async move {
            let Some(token) = token else {
                return Err(HttpErrorResponse::TokenMissing(String::from(
                    "Missing or invalid credentials",
                )));
            };

            let Some(registry) = registry else {
                log::error!("Session registry is not configured");
                return Err(HttpErrorResponse::InternalError(String::from(
                    "Sessions are unavailable",
                )));
            };

            match registry.resolve(&token).await? {
                Some(session) => Ok(CurrentSession(session)),
                None => Err(HttpErrorResponse::BadToken(String::from(
                    "Invalid or expired token",
                ))),
            }
        })
    }
}
