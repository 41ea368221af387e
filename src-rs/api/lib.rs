pub mod handlers;
pub mod server;

pub use handlers::{ListQuery, ServiceState};
pub use server::{GeoTaskServer, RunningServer, ServerConfig};
