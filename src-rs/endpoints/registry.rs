use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::subscription::ListSubscription;
use super::tags::{CacheTag, TagStore, GEO_TASK_ENTITY};
use crate::result::QueryResult;
use crate::task::{
    validate_create, validate_list, CreateGeoTaskRequest, ExecuteGeoTaskRequest,
    ExecuteGeoTaskResponse, GeoTask, GetCategoriesResponse, ListGeoTasksRequest,
    ListGeoTasksResponse,
};
use crate::transport::{ApiError, HttpMethod, LogicalRequest, TransportRouter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheEffect {
    /// Provides the collection tag plus one tag per returned item.
    ProvidesList,
    /// Invalidates the collection tag on success.
    InvalidatesCollection,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndpointDef {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub cache: CacheEffect,
}

pub const LIST_GEO_TASKS: EndpointDef = EndpointDef {
    name: "listGeoTasks",
    method: HttpMethod::Get,
    path: "/api/geo-task/list",
    cache: CacheEffect::ProvidesList,
};

pub const CREATE_GEO_TASK: EndpointDef = EndpointDef {
    name: "createGeoTask",
    method: HttpMethod::Post,
    path: "/api/geo-task/add",
    cache: CacheEffect::InvalidatesCollection,
};

pub const EXECUTE_GEO_TASK: EndpointDef = EndpointDef {
    name: "executeGeoTask",
    method: HttpMethod::Post,
    path: "/api/geo-task/execute",
    cache: CacheEffect::None,
};

pub const GET_CATEGORIES: EndpointDef = EndpointDef {
    name: "getCategories",
    method: HttpMethod::Get,
    path: "/api/categories",
    cache: CacheEffect::None,
};

pub static ENDPOINTS: [EndpointDef; 4] = [LIST_GEO_TASKS, CREATE_GEO_TASK, EXECUTE_GEO_TASK, GET_CATEGORIES];

pub fn endpoint(name: &str) -> Option<&'static EndpointDef> {
    ENDPOINTS.iter().find(|def| def.name == name)
}

impl EndpointDef {
    pub fn request(&self) -> LogicalRequest {
        LogicalRequest::new(self.method.as_str(), self.path)
    }
}

/// Typed Geo Task operations over a [`TransportRouter`], with tag bookkeeping.
#[derive(Clone)]
pub struct GeoTaskApi {
    router: Arc<TransportRouter>,
    tags: Arc<TagStore>,
}

impl GeoTaskApi {
    pub fn new(router: Arc<TransportRouter>) -> Self {
        Self {
            router,
            tags: Arc::new(TagStore::new(GEO_TASK_ENTITY)),
        }
    }

    pub fn router(&self) -> &TransportRouter {
        &self.router
    }

    pub fn tags(&self) -> &TagStore {
        &self.tags
    }

    pub async fn list(
        &self,
        params: &ListGeoTasksRequest,
        cancel: &CancellationToken,
    ) -> QueryResult<ListGeoTasksResponse> {
        let request = match list_request(params) {
            Ok(request) => request,
            Err(err) => return QueryResult::Error(err),
        };
        let result: QueryResult<ListGeoTasksResponse> =
            self.router.dispatch(&request, cancel).await.and_then(decode);
        match &result {
            QueryResult::Data(page) => {
                let tags = self.tags.provide_list(page.items.iter().map(|task| task.id.as_str()));
                debug!(items = page.items.len(), tags = tags.len(), "geo task list provided");
            }
            QueryResult::Error(_) => {
                self.tags.provide_collection();
            }
            QueryResult::Cancelled => {}
        }
        result
    }

    pub async fn create(
        &self,
        request: &CreateGeoTaskRequest,
        cancel: &CancellationToken,
    ) -> QueryResult<GeoTask> {
        let logical = match create_request(request) {
            Ok(logical) => logical,
            Err(err) => return QueryResult::Error(err),
        };
        let outcome = self.router.dispatch(&logical, cancel).await;
        // The service accepted the create even if its reply does not decode.
        if outcome.is_data() {
            self.tags.invalidate(&[CacheTag::collection(GEO_TASK_ENTITY)]);
        }
        let result = outcome.and_then(decode::<GeoTask>);
        if let QueryResult::Data(task) = &result {
            info!(id = %task.id, "geo task created");
        }
        result
    }

    pub async fn execute(
        &self,
        request: &ExecuteGeoTaskRequest,
        cancel: &CancellationToken,
    ) -> QueryResult<ExecuteGeoTaskResponse> {
        let logical = match execute_request(request) {
            Ok(logical) => logical,
            Err(err) => return QueryResult::Error(err),
        };
        self.router.dispatch(&logical, cancel).await.and_then(decode)
    }

    pub async fn list_categories(&self, cancel: &CancellationToken) -> QueryResult<GetCategoriesResponse> {
        self.router
            .dispatch(&GET_CATEGORIES.request(), cancel)
            .await
            .and_then(decode)
    }

    /// Subscription that refetches `params` whenever the list is invalidated.
    pub fn subscribe_list(&self, params: ListGeoTasksRequest) -> ListSubscription {
        ListSubscription::new(self.clone(), params, self.tags.subscribe())
    }
}

pub fn list_request(params: &ListGeoTasksRequest) -> Result<LogicalRequest, ApiError> {
    validate_list(params)?;
    Ok(LIST_GEO_TASKS.request().with_params(to_map(params)?))
}

pub fn create_request(request: &CreateGeoTaskRequest) -> Result<LogicalRequest, ApiError> {
    validate_create(request)?;
    Ok(CREATE_GEO_TASK.request().with_body(to_value(request)?))
}

pub fn execute_request(request: &ExecuteGeoTaskRequest) -> Result<LogicalRequest, ApiError> {
    Ok(EXECUTE_GEO_TASK.request().with_body(to_value(request)?))
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}

fn to_map<T: Serialize>(value: &T) -> Result<Map<String, Value>, ApiError> {
    match to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::Decode(format!("expected an object, got {}", other))),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}
