use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderName, ACCEPT};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::secondary::query_pairs;
use super::types::{ApiError, HostClient, HostOptions, HttpMethod, LogicalRequest};
use crate::config::SessionToken;

/// Forwards requests, path untouched, to the host application's client.
pub struct PrimaryTransport {
    host: Arc<dyn HostClient>,
}

impl PrimaryTransport {
    pub fn new(host: Arc<dyn HostClient>) -> Self {
        Self { host }
    }

    pub async fn send(&self, method: HttpMethod, request: &LogicalRequest) -> Result<Value, ApiError> {
        let payload = merge_payload(request.body.as_ref(), request.params.as_ref());
        debug!(%method, path = %request.path, "host api request");
        self.host
            .request(method, &request.path, payload, &request.options)
            .await
    }
}

/// Body entries first, then params; params win on key collisions.
/// Top-level arrays spread into index keys, scalars contribute nothing.
pub fn merge_payload(body: Option<&Value>, params: Option<&Map<String, Value>>) -> Map<String, Value> {
    let mut payload = Map::new();
    match body {
        Some(Value::Object(entries)) => {
            for (key, value) in entries {
                payload.insert(key.clone(), value.clone());
            }
        }
        Some(Value::Array(items)) => {
            for (idx, value) in items.iter().enumerate() {
                payload.insert(idx.to_string(), value.clone());
            }
        }
        _ => {}
    }
    if let Some(params) = params {
        for (key, value) in params {
            payload.insert(key.clone(), value.clone());
        }
    }
    payload
}

/// Default host client: the host application's HTTP API behind a session header.
pub struct HttpHostClient {
    base_url: String,
    session: Option<SessionToken>,
    client: Client,
}

impl HttpHostClient {
    pub fn new(base_url: &str, session: Option<SessionToken>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .build()
            .map_err(|err| ApiError::Config(err.to_string()))?;
        Ok(Self {
            base_url: base_url.to_string(),
            session,
            client,
        })
    }
}

#[async_trait]
impl HostClient for HttpHostClient {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Map<String, Value>,
        options: &HostOptions,
    ) -> Result<Value, ApiError> {
        let endpoint = format!("{}{}", self.base_url.trim_end_matches('/'), url);
        let mut builder = self
            .client
            .request(method.to_reqwest(), &endpoint)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.session {
            builder = builder.header(HeaderName::from_static("x-metabase-session"), token.header_value());
        }

        builder = match method {
            HttpMethod::Get | HttpMethod::Delete => {
                let pairs = query_pairs(&payload);
                if pairs.is_empty() {
                    builder
                } else {
                    builder.query(&pairs)
                }
            }
            HttpMethod::Post | HttpMethod::Put => {
                let body = match &options.body_param_name {
                    Some(name) => payload.get(name).cloned().unwrap_or(Value::Null),
                    None => Value::Object(payload),
                };
                builder.json(&body)
            }
        };

        let resp = builder.send().await.map_err(|err| {
            warn!(%method, url = %endpoint, error = %err, "host api request did not complete");
            ApiError::network(err)
        })?;
        let status = resp.status();
        if !status.is_success() {
            let data = resp.text().await.unwrap_or_default();
            return Err(ApiError::Transport {
                status: status.as_u16(),
                data,
                message: format!("host API responded with HTTP {}", status.as_u16()),
            });
        }
        let text = resp.text().await.map_err(|err| {
            warn!(%method, url = %endpoint, error = %err, "host api response body could not be read");
            ApiError::network(err)
        })?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}
