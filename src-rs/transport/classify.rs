/// Endpoints served by the dedicated Geo Task service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeoTaskEndpoint {
    List,
    Add,
    Execute,
    Categories,
}

impl GeoTaskEndpoint {
    pub const ALL: [GeoTaskEndpoint; 4] = [Self::List, Self::Add, Self::Execute, Self::Categories];

    pub fn path(&self) -> &'static str {
        match self {
            Self::List => "/api/geo-task/list",
            Self::Add => "/api/geo-task/add",
            Self::Execute => "/api/geo-task/execute",
            Self::Categories => "/api/categories",
        }
    }

    /// Only the list endpoint forwards params as a query string.
    pub fn carries_query(&self) -> bool {
        matches!(self, Self::List)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// The host application's own API.
    Primary,
    Secondary(GeoTaskEndpoint),
}

pub fn classify(path: &str) -> Backend {
    GeoTaskEndpoint::ALL
        .into_iter()
        .find(|endpoint| matches_prefix(path, endpoint.path()))
        .map(Backend::Secondary)
        .unwrap_or(Backend::Primary)
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}
