use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::task::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "DELETE")]
    Delete,
}

impl HttpMethod {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(ApiError::UnsupportedMethod(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass-through options for the host application's request function.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HostOptions {
    /// Send only this key of the merged payload as the request body.
    pub body_param_name: Option<String>,
    /// Suppress the host's request-lifecycle events.
    pub no_event: bool,
}

/// A request as issued by the endpoint layer, before backend selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogicalRequest {
    pub method: String,
    pub path: String,
    pub params: Option<Map<String, Value>>,
    pub body: Option<Value>,
    #[serde(default)]
    pub options: HostOptions,
}

impl LogicalRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            params: None,
            body: None,
            options: HostOptions::default(),
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(HttpMethod::Get.as_str(), path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(HttpMethod::Post.as_str(), path)
    }

    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, Error, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The call could not complete; no status is available.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Transport {
        status: u16,
        data: String,
        message: String,
    },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn network(err: impl fmt::Display) -> Self {
        Self::Network(format!("{} (check your connection and try again)", err))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for errors raised before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnsupportedMethod(_) | Self::Config(_))
    }
}

/// The host application's authenticated request function.
#[async_trait]
pub trait HostClient: Send + Sync {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Map<String, Value>,
        options: &HostOptions,
    ) -> Result<Value, ApiError>;
}
