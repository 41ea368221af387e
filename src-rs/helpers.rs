use std::env;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{GeoTaskConfig, SessionToken, ORIGIN_ENV_VAR};
use crate::endpoints::GeoTaskApi;
use crate::transport::{ApiError, GeoTaskServiceTransport, HostClient, HttpHostClient, TransportRouter};

pub const PRIMARY_URL_ENV_VAR: &str = "GEO_TASK_PRIMARY_URL";
pub const RUNTIME_HOST_ENV_VAR: &str = "GEO_TASK_RUNTIME_HOST";
pub const SESSION_ENV_VAR: &str = "GEO_TASK_SESSION";

fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

/// Host part of `url`, or `None` when it cannot be parsed.
pub fn host_of(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    parsed.host_str().map(str::to_string)
}

/// The runtime host defaults to the host of the primary URL, the closest
/// analogue of the page the host application is served from. A session
/// token that cannot be sent as a header is a config error.
pub fn load_config_from_env() -> Result<GeoTaskConfig, ApiError> {
    let mut cfg = GeoTaskConfig::default();
    if let Some(url) = env_opt(PRIMARY_URL_ENV_VAR) {
        cfg.primary_base_url = url;
    }
    cfg.runtime_host = env_opt(RUNTIME_HOST_ENV_VAR)
        .or_else(|| host_of(&cfg.primary_base_url))
        .unwrap_or_default();
    cfg.secondary_origin_override = env_opt(ORIGIN_ENV_VAR);
    cfg.session = env_opt(SESSION_ENV_VAR)
        .map(SessionToken::new)
        .transpose()
        .map_err(|err| ApiError::Config(format!("{}: {}", SESSION_ENV_VAR, err)))?;
    Ok(cfg)
}

/// The secondary origin is resolved once, here.
pub fn build_router_with_host(cfg: &GeoTaskConfig, host: Arc<dyn HostClient>) -> Result<TransportRouter, ApiError> {
    let secondary = GeoTaskServiceTransport::new(&cfg.secondary_origin(), cfg.session.clone())?;
    Ok(TransportRouter::new(host, secondary))
}

pub fn build_router(cfg: &GeoTaskConfig) -> Result<TransportRouter, ApiError> {
    let host = HttpHostClient::new(&cfg.primary_base_url, cfg.session.clone())?;
    build_router_with_host(cfg, Arc::new(host))
}

pub fn build_api(cfg: &GeoTaskConfig) -> Result<GeoTaskApi, ApiError> {
    Ok(GeoTaskApi::new(Arc::new(build_router(cfg)?)))
}

/// Human-readable logs to stderr, filtered by `RUST_LOG` (default `default_level`).
pub fn init_logging(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LOCAL_DEV_ORIGIN, PRODUCTION_ORIGIN};

    #[test]
    fn host_of_extracts_host() {
        assert_eq!(host_of("http://localhost:3000"), Some("localhost".to_string()));
        assert_eq!(host_of("https://bi.example.com/app"), Some("bi.example.com".to_string()));
        assert_eq!(host_of("not a url"), None);
    }

    #[test]
    fn unsendable_session_token_in_env_is_a_config_error() {
        env::set_var(SESSION_ENV_VAR, "bad\ttoken\u{1}");
        let result = load_config_from_env();
        env::remove_var(SESSION_ENV_VAR);
        assert!(matches!(result, Err(ApiError::Config(ref msg)) if msg.starts_with(SESSION_ENV_VAR)));
    }

    #[test]
    fn router_resolves_secondary_origin_once() {
        let cfg = GeoTaskConfig::default();
        let router = build_router(&cfg).unwrap();
        assert_eq!(router.secondary_origin(), LOCAL_DEV_ORIGIN);

        let remote = GeoTaskConfig {
            runtime_host: "bi.example.com".to_string(),
            ..GeoTaskConfig::default()
        };
        assert_eq!(build_router(&remote).unwrap().secondary_origin(), PRODUCTION_ORIGIN);
    }
}
