use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::registry::GeoTaskApi;
use crate::result::QueryResult;
use crate::task::{ListGeoTasksRequest, ListGeoTasksResponse};

/// An active list query. Invalidations raised since the subscription was
/// created (or since the last refetch) trigger exactly one refetch.
pub struct ListSubscription {
    api: GeoTaskApi,
    params: ListGeoTasksRequest,
    invalidations: watch::Receiver<u64>,
}

impl ListSubscription {
    pub(crate) fn new(api: GeoTaskApi, params: ListGeoTasksRequest, invalidations: watch::Receiver<u64>) -> Self {
        Self {
            api,
            params,
            invalidations,
        }
    }

    pub fn params(&self) -> &ListGeoTasksRequest {
        &self.params
    }

    pub async fn fetch(&self, cancel: &CancellationToken) -> QueryResult<ListGeoTasksResponse> {
        self.api.list(&self.params, cancel).await
    }

    /// Waits for the next invalidation, then refetches.
    pub async fn next_refetch(&mut self, cancel: &CancellationToken) -> QueryResult<ListGeoTasksResponse> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return QueryResult::Cancelled,
            changed = self.invalidations.changed() => {
                if changed.is_err() {
                    return QueryResult::Cancelled;
                }
            }
        }
        self.api.list(&self.params, cancel).await
    }
}
