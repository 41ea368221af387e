use geo_task_rs::helpers::build_api;
use geo_task_rs::task::{
    CreateGeoTaskRequest, ExecuteGeoTaskRequest, ExecuteGeoTaskResponse, GeoTask,
    GetCategoriesResponse, ListGeoTasksRequest, ListGeoTasksResponse,
};
use geo_task_rs::{GeoTaskApi, GeoTaskConfig, ListSubscription, QueryResult};
use tokio_util::sync::CancellationToken;

pub struct GeoTaskClient {
    api: GeoTaskApi,
}

/// Token cancelled by Ctrl-C while a call is in flight.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => trigger.cancel(),
            _ = trigger.cancelled() => {}
        }
    });
    cancel
}

fn into_cli<T>(result: QueryResult<T>) -> Result<T, String> {
    match result.into_result() {
        Some(Ok(data)) => Ok(data),
        Some(Err(err)) => Err(err.to_string()),
        None => Err("cancelled".to_string()),
    }
}

impl GeoTaskClient {
    pub fn new(cfg: &GeoTaskConfig) -> Result<Self, String> {
        let api = build_api(cfg).map_err(|err| err.to_string())?;
        Ok(Self { api })
    }

    pub fn secondary_origin(&self) -> &str {
        self.api.router().secondary_origin()
    }

    pub fn subscribe_list(&self, params: ListGeoTasksRequest) -> ListSubscription {
        self.api.subscribe_list(params)
    }

    pub async fn list(&self, params: &ListGeoTasksRequest) -> Result<ListGeoTasksResponse, String> {
        let cancel = cancel_on_ctrl_c();
        let result = self.api.list(params, &cancel).await;
        cancel.cancel();
        into_cli(result)
    }

    pub async fn refetch(&self, subscription: &mut ListSubscription) -> Result<ListGeoTasksResponse, String> {
        let cancel = cancel_on_ctrl_c();
        let result = subscription.next_refetch(&cancel).await;
        cancel.cancel();
        into_cli(result)
    }

    pub async fn create(&self, request: &CreateGeoTaskRequest) -> Result<GeoTask, String> {
        let cancel = cancel_on_ctrl_c();
        let result = self.api.create(request, &cancel).await;
        cancel.cancel();
        into_cli(result)
    }

    pub async fn execute(&self, id: &str) -> Result<ExecuteGeoTaskResponse, String> {
        let request = ExecuteGeoTaskRequest {
            geo_task_id: id.to_string(),
        };
        let cancel = cancel_on_ctrl_c();
        let result = self.api.execute(&request, &cancel).await;
        cancel.cancel();
        into_cli(result)
    }

    pub async fn categories(&self) -> Result<GetCategoriesResponse, String> {
        let cancel = cancel_on_ctrl_c();
        let result = self.api.list_categories(&cancel).await;
        cancel.cancel();
        into_cli(result)
    }
}
