use std::fmt;
use std::sync::Arc;

use reqwest::header::HeaderValue;
use thiserror::Error;

/// Origin used whenever the host application is served from a loopback host.
pub const LOCAL_DEV_ORIGIN: &str = "http://localhost:8000";
/// Fallback origin of the deployed Geo Task service.
pub const PRODUCTION_ORIGIN: &str = "http://47.97.180.126:8000";
/// Environment variable that overrides the secondary origin on non-loopback hosts.
pub const ORIGIN_ENV_VAR: &str = "GEO_TASK_API_URL";

const DEFAULT_PRIMARY_URL: &str = "http://localhost:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionTokenError {
    #[error("session token is empty")]
    Empty,
    #[error("session token contains characters not allowed in an HTTP header")]
    InvalidHeader,
}

/// Read-only session credential issued by the host application at login.
/// Always valid as a header value; marked sensitive so it stays out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    token: Arc<str>,
    header: HeaderValue,
}

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Result<Self, SessionTokenError> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(SessionTokenError::Empty);
        }
        let mut header = HeaderValue::from_str(trimmed).map_err(|_| SessionTokenError::InvalidHeader)?;
        header.set_sensitive(true);
        Ok(Self {
            token: Arc::from(trimmed),
            header,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn header_value(&self) -> HeaderValue {
        self.header.clone()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

#[derive(Clone, Debug)]
pub struct GeoTaskConfig {
    /// Base URL of the host application's own API.
    pub primary_base_url: String,
    /// Host name the application runs on; drives secondary origin selection.
    pub runtime_host: String,
    pub secondary_origin_override: Option<String>,
    pub session: Option<SessionToken>,
}

impl Default for GeoTaskConfig {
    fn default() -> Self {
        Self {
            primary_base_url: DEFAULT_PRIMARY_URL.to_string(),
            runtime_host: "localhost".to_string(),
            secondary_origin_override: None,
            session: None,
        }
    }
}

impl GeoTaskConfig {
    pub fn secondary_origin(&self) -> String {
        resolve_secondary_origin(&self.runtime_host, self.secondary_origin_override.as_deref())
    }
}

pub fn is_loopback_host(host: &str) -> bool {
    matches!(host.trim(), "" | "localhost" | "127.0.0.1" | "::1" | "[::1]")
}

/// Loopback host wins over the override, the override wins over production.
/// An empty override counts as absent.
pub fn resolve_secondary_origin(host: &str, env_override: Option<&str>) -> String {
    if is_loopback_host(host) {
        return LOCAL_DEV_ORIGIN.to_string();
    }
    match env_override {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => PRODUCTION_ORIGIN.to_string(),
    }
}
