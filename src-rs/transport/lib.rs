pub mod classify;
pub mod primary;
pub mod router;
pub mod secondary;
pub mod types;

pub use classify::{classify, Backend, GeoTaskEndpoint};
pub use primary::{merge_payload, HttpHostClient, PrimaryTransport};
pub use router::TransportRouter;
pub use secondary::{build_headers, build_url, GeoTaskServiceTransport, SESSION_HEADER};
pub use types::{ApiError, HostClient, HostOptions, HttpMethod, LogicalRequest};
