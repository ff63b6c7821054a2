use expertnet_common::auth::{AuthBackend, Authenticator, LiveAuthBackend, MockAuthBackend};
use expertnet_common::cms::CmsClient;
use expertnet_common::directory::{Directory, LiveDirectory, MockDirectory};
use expertnet_common::friends::{FriendGateway, LiveFriendGateway, MockFriendGateway};
use expertnet_common::retry::RetryPolicy;

use actix_web::web::{Data, ServiceConfig};
use std::sync::Arc;
use std::time::Duration;

use crate::env::BackendMode;
use crate::utils::session_registry::{SessionRegistry, SessionSettings};

/// Everything a handler may need, built once at startup for either the mock or the
/// live backend.
#[derive(Clone)]
pub struct AppState {
    pub mode: BackendMode,
    pub friends: Arc<dyn FriendGateway>,
    pub auth: Arc<Authenticator>,
    pub directory: Arc<dyn Directory>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn mock(
        latency: Duration,
        consultant_lookup: RetryPolicy,
        sessions: SessionSettings,
    ) -> Self {
        let backend: Arc<dyn AuthBackend> = Arc::new(MockAuthBackend::new());
        let auth = Arc::new(Authenticator::new(backend, consultant_lookup));

        let sessions = Arc::new(SessionRegistry::with_session(
            sessions,
            Some(Arc::clone(&auth)),
            MockAuthBackend::default_session(),
        ));

        Self {
            mode: BackendMode::Mock,
            friends: Arc::new(MockFriendGateway::seeded(latency)),
            auth,
            directory: Arc::new(MockDirectory::new()),
            sessions,
        }
    }

    pub fn live(
        backend_url: &str,
        api_token: Option<&str>,
        timeout: Duration,
        consultant_lookup: RetryPolicy,
        sessions: SessionSettings,
    ) -> Result<Self, reqwest::Error> {
        let cms = CmsClient::new(backend_url, timeout)?;

        let backend: Arc<dyn AuthBackend> = Arc::new(LiveAuthBackend::new(cms.clone()));
        let auth = Arc::new(Authenticator::new(backend, consultant_lookup));

        Ok(Self {
            mode: BackendMode::Live,
            friends: Arc::new(LiveFriendGateway::new(cms.clone())),
            auth: Arc::clone(&auth),
            directory: Arc::new(LiveDirectory::new(cms, api_token.map(String::from))),
            sessions: Arc::new(SessionRegistry::new(sessions, Some(auth))),
        })
    }

    pub fn configure(&self, cfg: &mut ServiceConfig) {
        cfg.app_data(Data::new(self.mode))
            .app_data(Data::from(Arc::clone(&self.friends)))
            .app_data(Data::from(Arc::clone(&self.auth)))
            .app_data(Data::from(Arc::clone(&self.directory)))
            .app_data(Data::from(Arc::clone(&self.sessions)));
    }
}
