use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::classify::{classify, Backend};
use super::primary::PrimaryTransport;
use super::secondary::GeoTaskServiceTransport;
use super::types::{HostClient, HttpMethod, LogicalRequest};
use crate::result::QueryResult;

/// Single dispatch point in front of both backends. Each call is one attempt:
/// no retries, no timeout beyond the caller's cancellation token.
pub struct TransportRouter {
    primary: PrimaryTransport,
    secondary: GeoTaskServiceTransport,
}

impl TransportRouter {
    pub fn new(host: Arc<dyn HostClient>, secondary: GeoTaskServiceTransport) -> Self {
        Self {
            primary: PrimaryTransport::new(host),
            secondary,
        }
    }

    pub fn secondary_origin(&self) -> &str {
        self.secondary.origin()
    }

    pub async fn dispatch(&self, request: &LogicalRequest, cancel: &CancellationToken) -> QueryResult<Value> {
        let method = match HttpMethod::parse(&request.method) {
            Ok(method) => method,
            Err(err) => return QueryResult::Error(err),
        };
        let backend = classify(&request.path);
        debug!(%method, path = %request.path, ?backend, "dispatching");

        let call = async {
            match backend {
                Backend::Primary => self.primary.send(method, request).await,
                Backend::Secondary(endpoint) => self.secondary.send(method, endpoint, request).await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%method, path = %request.path, "request cancelled");
                QueryResult::Cancelled
            }
            outcome = call => QueryResult::from(outcome),
        }
    }
}
