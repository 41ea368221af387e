use geo_task_rs::task::ListGeoTasksRequest;
use geo_task_rs::GeoTaskConfig;

#[derive(Clone, Debug)]
pub struct CLIConfig {
    pub geo: GeoTaskConfig,
    /// Category attached to tasks created with `/add`.
    pub category: Option<String>,
    pub list: ListGeoTasksRequest,
}
