use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{AuthBackend, AuthError, AuthGrant};
use crate::cms::{CmsClient, CmsResponse, Envelope};
use crate::models::user::User;

#[derive(Clone)]
pub struct LiveAuthBackend {
    cms: CmsClient,
}

#[derive(Deserialize)]
struct GrantBody {
    jwt: Option<String>,
    user: Option<User>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsultantRef {
    #[serde(default)]
    document_id: Option<String>,
}

impl LiveAuthBackend {
    pub fn new(cms: CmsClient) -> Self {
        Self { cms }
    }
}

/// A grant is any body carrying a `jwt` and a `user`; everything else is a rejection
/// with the backend's message or `fallback`.
pub fn parse_grant(resp: &CmsResponse, fallback: &str) -> Result<AuthGrant, AuthError> {
    if let Ok(GrantBody {
        jwt: Some(jwt),
        user: Some(user),
    }) = resp.parse::<GrantBody>()
    {
        if !jwt.is_empty() {
            return Ok(AuthGrant { jwt, user });
        }
    }

    if resp.is_success() {
        return Err(AuthError::Decode(String::from(
            "Response carried no token or user",
        )));
    }

    Err(AuthError::Rejected(
        resp.error_message()
            .unwrap_or_else(|| String::from(fallback)),
    ))
}

fn check_token(resp: &CmsResponse, fallback: &str) -> Result<(), AuthError> {
    match resp.status {
        s if s.is_success() => Ok(()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidToken),
        _ => Err(AuthError::Rejected(
            resp.error_message()
                .unwrap_or_else(|| String::from(fallback)),
        )),
    }
}

/// The first non-empty `documentId` in a consultant listing.
pub fn first_document_id(resp: &CmsResponse) -> Result<Option<String>, AuthError> {
    let envelope = resp.parse::<Envelope<Vec<ConsultantRef>>>()?;

    Ok(envelope
        .data
        .into_iter()
        .filter_map(|c| c.document_id)
        .find(|id| !id.is_empty()))
}

#[async_trait]
impl AuthBackend for LiveAuthBackend {
    async fn login(&self, identifier: &str, password: &str) -> Result<AuthGrant, AuthError> {
        let builder = self
            .cms
            .request(Method::POST, "/api/auth/local", None)
            .json(&json!({ "identifier": identifier, "password": password }));

        let resp = CmsResponse::send(builder).await?;
        parse_grant(&resp, "Login failed")
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, AuthError> {
        let builder = self
            .cms
            .request(Method::POST, "/api/auth/local/register", None)
            .json(&json!({ "username": username, "email": email, "password": password }));

        let resp = CmsResponse::send(builder).await?;
        parse_grant(&resp, "Registration failed")
    }

    async fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let builder = self.cms.request(Method::GET, "/api/users/me", Some(token));

        let resp = CmsResponse::send(builder).await?;
        check_token(&resp, "Failed to fetch current user")?;

        Ok(resp.parse::<User>()?)
    }

    async fn find_consultant_id(
        &self,
        token: &str,
        user_id: u64,
    ) -> Result<Option<String>, AuthError> {
        let builder = self
            .cms
            .request(Method::GET, "/api/consultants", Some(token))
            .query(&[("filters[user][id][$eq]", user_id.to_string())]);

        let resp = CmsResponse::send(builder).await?;
        check_token(&resp, "Failed to look up consultant profile")?;

        first_document_id(&resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> CmsResponse {
        CmsResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_parse_grant() {
        let grant = parse_grant(
            &response(
                200,
                r#"{"jwt":"abc","user":{"id":7,"username":"sam","email":"sam@example.com"}}"#,
            ),
            "Login failed",
        )
        .unwrap();

        assert_eq!(grant.jwt, "abc");
        assert_eq!(grant.user.id, 7);
    }

    #[test]
    fn test_parse_grant_rejections() {
        assert_eq!(
            parse_grant(
                &response(
                    400,
                    r#"{"data":null,"error":{"status":400,"name":"ValidationError","message":"Invalid identifier or password"}}"#
                ),
                "Login failed"
            ),
            Err(AuthError::Rejected(String::from(
                "Invalid identifier or password"
            )))
        );

        assert_eq!(
            parse_grant(&response(400, "{}"), "Registration failed"),
            Err(AuthError::Rejected(String::from("Registration failed")))
        );

        assert_eq!(
            parse_grant(&response(502, "<html></html>"), "Login failed"),
            Err(AuthError::Rejected(String::from("Login failed")))
        );

        assert!(matches!(
            parse_grant(&response(200, r#"{"jwt":""}"#), "Login failed"),
            Err(AuthError::Decode(_))
        ));
    }

    #[test]
    fn test_first_document_id() {
        let resp = response(
            200,
            r#"{"data":[{"id":1,"documentId":""},{"id":2,"documentId":"xyz"}],"meta":{"pagination":{"total":2}}}"#,
        );
        assert_eq!(first_document_id(&resp).unwrap().as_deref(), Some("xyz"));

        let empty = response(200, r#"{"data":[]}"#);
        assert_eq!(first_document_id(&empty).unwrap(), None);

        assert!(matches!(
            first_document_id(&response(200, "nope")),
            Err(AuthError::Decode(_))
        ));
    }

    #[test]
    fn test_check_token() {
        assert_eq!(
            check_token(&response(401, "{}"), "x"),
            Err(AuthError::InvalidToken)
        );
        assert!(check_token(&response(200, "{}"), "x").is_ok());
        assert_eq!(
            check_token(&response(500, "{}"), "x"),
            Err(AuthError::Rejected(String::from("x")))
        );
    }
}
