pub mod config;
pub mod helpers;
pub mod result;

#[path = "transport/lib.rs"]
pub mod transport;
#[path = "endpoints/lib.rs"]
pub mod endpoints;
#[path = "task/lib.rs"]
pub mod task;
#[path = "api/lib.rs"]
pub mod api;

pub use config::{GeoTaskConfig, SessionToken, SessionTokenError};
pub use endpoints::{CacheTag, GeoTaskApi, ListSubscription, TagStore};
pub use result::QueryResult;
pub use transport::{ApiError, HttpMethod, LogicalRequest, TransportRouter};
