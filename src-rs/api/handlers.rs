use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::task::{
    validate_create, validate_list, Category, CreateGeoTaskRequest, ExecuteGeoTaskRequest,
    ExecuteGeoTaskResponse, GeoTaskStore, GetCategoriesResponse, ListGeoTasksRequest,
};
use crate::transport::SESSION_HEADER;

#[derive(Clone)]
pub struct ServiceState {
    pub store: Arc<GeoTaskStore>,
    pub categories: Arc<Vec<Category>>,
    /// When set, requests must carry this value in the session header.
    pub required_session: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub enabled: Option<bool>,
    pub platform_id: Option<String>,
    pub usr_company_id: Option<String>,
}

impl ListQuery {
    fn into_request(self) -> ListGeoTasksRequest {
        let defaults = ListGeoTasksRequest::default();
        ListGeoTasksRequest {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            enabled: self.enabled,
            platform_id: self.platform_id,
            usr_company_id: self.usr_company_id,
        }
    }
}

pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}

pub async fn handle_list(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    if let Err(rejection) = check_session(&state, &headers) {
        return rejection;
    }
    let request = query.into_request();
    if let Err(err) = validate_list(&request) {
        return cors_json(StatusCode::UNPROCESSABLE_ENTITY, json!({"detail": err.to_string()}));
    }
    let page = state.store.list(&request);
    cors_json(StatusCode::OK, json!(page))
}

pub async fn handle_add(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Json(req): Json<CreateGeoTaskRequest>,
) -> Response {
    if let Err(rejection) = check_session(&state, &headers) {
        return rejection;
    }
    if let Err(err) = validate_create(&req) {
        return cors_json(StatusCode::UNPROCESSABLE_ENTITY, json!({"detail": err.to_string()}));
    }
    let task = state.store.create(req);
    info!(id = %task.id, "geo task added");
    cors_json(StatusCode::OK, json!(task))
}

pub async fn handle_execute(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Json(req): Json<ExecuteGeoTaskRequest>,
) -> Response {
    if let Err(rejection) = check_session(&state, &headers) {
        return rejection;
    }
    match state.store.mark_executed(&req.geo_task_id) {
        Some(task) => {
            info!(id = %task.id, "geo task executed");
            let resp = ExecuteGeoTaskResponse {
                success: true,
                inserted: 1,
                task_count: 1,
                task_ids: vec![task.id.clone()],
                message: format!("geo task {} queued for execution", task.id),
            };
            cors_json(StatusCode::OK, json!(resp))
        }
        None => cors_json(
            StatusCode::NOT_FOUND,
            json!({"detail": format!("geo task not found: {}", req.geo_task_id)}),
        ),
    }
}

pub async fn handle_categories(State(state): State<ServiceState>, headers: HeaderMap) -> Response {
    if let Err(rejection) = check_session(&state, &headers) {
        return rejection;
    }
    let resp = GetCategoriesResponse {
        success: true,
        categories: state.categories.as_ref().clone(),
        total: state.categories.len() as u64,
    };
    cors_json(StatusCode::OK, json!(resp))
}

/// Auth runs ahead of CORS handling, so the rejection carries no CORS header.
fn check_session(state: &ServiceState, headers: &HeaderMap) -> Result<(), Response> {
    let expected = match &state.required_session {
        Some(expected) => expected,
        None => return Ok(()),
    };
    let provided = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok());
    if provided == Some(expected.as_str()) {
        Ok(())
    } else {
        Err((StatusCode::FORBIDDEN, "forbidden").into_response())
    }
}

fn cors_json(status: StatusCode, body: Value) -> Response {
    (status, [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")], Json(body)).into_response()
}
