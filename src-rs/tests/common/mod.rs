#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use geo_task_rs::api::{GeoTaskServer, RunningServer, ServerConfig};
use geo_task_rs::transport::{
    ApiError, GeoTaskServiceTransport, HostClient, HostOptions, HttpMethod, TransportRouter,
};
use geo_task_rs::{GeoTaskApi, SessionToken};

pub fn spawn_app(app: Router) -> String {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let server = axum::Server::bind(&addr).serve(app.into_make_service());
    let addr = server.local_addr();
    tokio::spawn(async move {
        let _ = server.await;
    });
    format!("http://{}", addr)
}

pub fn start_service(config: ServerConfig) -> RunningServer {
    GeoTaskServer::new(ServerConfig { port: 0, ..config })
        .spawn("127.0.0.1:0".parse().unwrap())
        .unwrap()
}

/// An origin that answers every request with a 200 whose body is cut short.
pub fn spawn_truncated_body() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    let listener = tokio::net::TcpListener::from_std(listener).unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            let _ = stream
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{\"ok\"")
                .await;
        }
    });
    format!("http://{}", addr)
}

/// An origin nothing listens on.
pub fn closed_origin() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[derive(Clone, Debug, PartialEq)]
pub struct HostCall {
    pub method: HttpMethod,
    pub url: String,
    pub payload: Map<String, Value>,
    pub options: HostOptions,
}

/// Host client double that records every call and answers `{"ok": true}`.
#[derive(Default)]
pub struct RecordingHost {
    pub calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostClient for RecordingHost {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Map<String, Value>,
        options: &HostOptions,
    ) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(HostCall {
            method,
            url: url.to_string(),
            payload,
            options: options.clone(),
        });
        Ok(json!({"ok": true}))
    }
}

pub fn router_for(origin: &str, session: Option<&str>, host: Arc<RecordingHost>) -> TransportRouter {
    let session = session.map(|raw| SessionToken::new(raw).unwrap());
    let secondary = GeoTaskServiceTransport::new(origin, session).unwrap();
    TransportRouter::new(host, secondary)
}

pub fn api_for(origin: &str, session: Option<&str>) -> (GeoTaskApi, Arc<RecordingHost>) {
    let host = Arc::new(RecordingHost::default());
    let router = router_for(origin, session, host.clone());
    (GeoTaskApi::new(Arc::new(router)), host)
}
