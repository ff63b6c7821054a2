use expertnet_common::retry::RetryPolicy;

use once_cell::sync::Lazy;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use zeroize::Zeroizing;

use crate::utils::session_registry::{SessionSettings, DEFAULT_REVALIDATE_AFTER};

pub static CONF: Lazy<Config> = Lazy::new(|| Config::from_env().expect("Failed to load config"));

const BACKEND_URL_VAR: &str = "EXPERTNET_BACKEND_URL";
const BACKEND_API_TOKEN_VAR: &str = "EXPERTNET_BACKEND_API_TOKEN";
const HTTP_TIMEOUT_SECS_VAR: &str = "EXPERTNET_HTTP_TIMEOUT_SECS";

const MOCK_LATENCY_MS_VAR: &str = "EXPERTNET_MOCK_LATENCY_MS";
const CONSULTANT_LOOKUP_ATTEMPTS_VAR: &str = "EXPERTNET_CONSULTANT_LOOKUP_ATTEMPTS";
const CONSULTANT_LOOKUP_DELAY_MS_VAR: &str = "EXPERTNET_CONSULTANT_LOOKUP_DELAY_MS";

const SESSION_DIR_VAR: &str = "EXPERTNET_SESSION_DIR";
const SESSION_REVALIDATE_SECS_VAR: &str = "EXPERTNET_SESSION_REVALIDATE_SECS";

const ACTIX_WORKER_COUNT_VAR: &str = "EXPERTNET_ACTIX_WORKER_COUNT";

const LOG_LEVEL_VAR: &str = "EXPERTNET_LOG_LEVEL";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendMode {
    Mock,
    Live,
}

impl BackendMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendMode::Mock => "mock",
            BackendMode::Live => "live",
        }
    }
}

pub struct Config {
    pub backend_url: Option<String>,
    pub backend_api_token: Option<Zeroizing<String>>,
    pub http_timeout: Duration,

    pub mock_latency: Duration,
    pub consultant_lookup: RetryPolicy,

    pub session_dir: Option<PathBuf>,
    pub session_revalidate_after: Duration,

    pub actix_worker_count: usize,

    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = env_var_opt(&lookup, BACKEND_URL_VAR);
        let backend_api_token = env_var_opt(&lookup, BACKEND_API_TOKEN_VAR).map(Zeroizing::new);

        if backend_api_token.is_some() && backend_url.is_none() {
            return Err(ConfigError::missing(BACKEND_URL_VAR));
        }

        if let Some(url) = &backend_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::invalid(BACKEND_URL_VAR));
            }
        }

        Ok(Config {
            backend_url,
            backend_api_token,
            http_timeout: Duration::from_secs(env_var_or(&lookup, HTTP_TIMEOUT_SECS_VAR, 15)?),

            mock_latency: Duration::from_millis(env_var_or(&lookup, MOCK_LATENCY_MS_VAR, 500)?),
            consultant_lookup: RetryPolicy::fixed(
                env_var_or(&lookup, CONSULTANT_LOOKUP_ATTEMPTS_VAR, 5)?,
                Duration::from_millis(env_var_or(&lookup, CONSULTANT_LOOKUP_DELAY_MS_VAR, 1000)?),
            ),

            session_dir: env_var_opt(&lookup, SESSION_DIR_VAR).map(PathBuf::from),
            session_revalidate_after: Duration::from_secs(env_var_or(
                &lookup,
                SESSION_REVALIDATE_SECS_VAR,
                DEFAULT_REVALIDATE_AFTER.as_secs(),
            )?),

            actix_worker_count: env_var_or(&lookup, ACTIX_WORKER_COUNT_VAR, num_cpus::get())?,

            log_level: env_var_or(&lookup, LOG_LEVEL_VAR, String::from("info"))?,
        })
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            dir: self.session_dir.clone(),
            revalidate_after: self.session_revalidate_after,
        }
    }

    pub fn mode(&self) -> BackendMode {
        if self.backend_url.is_some() {
            BackendMode::Live
        } else {
            BackendMode::Mock
        }
    }
}

fn env_var_opt<F>(lookup: &F, key: &'static str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn env_var_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(var) = env_var_opt(lookup, key) else {
        return Ok(default);
    };

    var.trim().parse().map_err(|_| ConfigError::invalid(key))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidVar(&'static str),
}

impl ConfigError {
    fn missing(var_name: &'static str) -> Self {
        Self::MissingVar(var_name)
    }

    fn invalid(var_name: &'static str) -> Self {
        Self::InvalidVar(var_name)
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVar(key) => write!(f, "Missing environment variable '{}'", key),
            Self::InvalidVar(key) => write!(f, "Environment variable '{}' is invalid", key),
        }
    }
}
