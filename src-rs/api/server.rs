use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::handlers::{
    handle_add, handle_categories, handle_execute, handle_health, handle_list, ServiceState,
};
use crate::task::{Category, GeoTaskStore};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub categories: Vec<Category>,
    pub required_session: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            categories: Vec::new(),
            required_session: None,
        }
    }
}

/// Local stand-in for the Geo Task service.
pub struct GeoTaskServer {
    pub port: u16,
    pub state: ServiceState,
}

/// A server running in the background on an ephemeral or fixed port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub handle: JoinHandle<()>,
}

impl RunningServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl GeoTaskServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            port: config.port,
            state: ServiceState {
                store: Arc::new(GeoTaskStore::new()),
                categories: Arc::new(config.categories),
                required_session: config.required_session,
            },
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handle_health))
            .route("/api/geo-task/list", get(handle_list))
            .route("/api/geo-task/add", post(handle_add))
            .route("/api/geo-task/execute", post(handle_execute))
            .route("/api/categories", get(handle_categories))
            .with_state(self.state.clone())
    }

    pub async fn start(&self) -> Result<(), String> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(%addr, "geo task dev service listening");
        axum::Server::try_bind(&addr)
            .map_err(|err| err.to_string())?
            .serve(self.router().into_make_service())
            .await
            .map_err(|err| err.to_string())
    }

    /// Binds `addr` (port 0 for an ephemeral port) and serves in the background.
    pub fn spawn(&self, addr: SocketAddr) -> Result<RunningServer, String> {
        let server = axum::Server::try_bind(&addr)
            .map_err(|err| err.to_string())?
            .serve(self.router().into_make_service());
        let addr = server.local_addr();
        let handle = tokio::spawn(async move {
            if let Err(err) = server.await {
                warn!(error = %err, "geo task dev service stopped");
            }
        });
        Ok(RunningServer { addr, handle })
    }
}
