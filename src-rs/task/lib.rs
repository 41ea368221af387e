pub mod store;
pub mod types;
pub mod validation;

pub use store::GeoTaskStore;
pub use types::{
    Category, CreateGeoTaskRequest, ExecuteGeoTaskRequest, ExecuteGeoTaskResponse, GeoTask,
    GetCategoriesResponse, ListGeoTasksRequest, ListGeoTasksResponse,
};
pub use validation::{
    validate_create, validate_list, ValidationError, QUERY_TEXT_MAX_CHARS, SCHEDULE_CRON_MAX_CHARS,
};
