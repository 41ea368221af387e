pub mod registry;
pub mod subscription;
pub mod tags;

pub use registry::{
    endpoint, CacheEffect, EndpointDef, GeoTaskApi, CREATE_GEO_TASK, ENDPOINTS, EXECUTE_GEO_TASK,
    GET_CATEGORIES, LIST_GEO_TASKS,
};
pub use subscription::ListSubscription;
pub use tags::{CacheTag, TagStore, GEO_TASK_ENTITY};
