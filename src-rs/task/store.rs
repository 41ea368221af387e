use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use chrono::{SecondsFormat, Utc};

use super::types::{CreateGeoTaskRequest, GeoTask, ListGeoTasksRequest, ListGeoTasksResponse};

static COUNTER: AtomicUsize = AtomicUsize::new(1);

/// In-memory task table backing the dev service. Insertion order is kept;
/// listings are newest first.
pub struct GeoTaskStore {
    tasks: RwLock<Vec<GeoTask>>,
}

impl Default for GeoTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
        }
    }

    pub fn create(&self, request: CreateGeoTaskRequest) -> GeoTask {
        let now = timestamp();
        let task = GeoTask {
            id: next_id(),
            platform_id: None,
            platform_name: request.platform_name,
            usr_company_id: None,
            usr_company_name: request.usr_company_name,
            query_text: request.query_text,
            brand_keywords: request.brand_keywords,
            enabled: Some(request.enabled.unwrap_or(true)),
            schedule_cron: request.schedule_cron.filter(|cron| !cron.is_empty()),
            category: request.category,
            last_run_at: None,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        if let Ok(mut tasks) = self.tasks.write() {
            tasks.push(task.clone());
        }
        task
    }

    pub fn get(&self, id: &str) -> Option<GeoTask> {
        let tasks = self.tasks.read().ok()?;
        tasks.iter().find(|task| task.id == id).cloned()
    }

    pub fn mark_executed(&self, id: &str) -> Option<GeoTask> {
        let mut tasks = self.tasks.write().ok()?;
        let task = tasks.iter_mut().find(|task| task.id == id)?;
        task.last_run_at = Some(timestamp());
        Some(task.clone())
    }

    /// `page` and `page_size` are expected to be validated already.
    pub fn list(&self, query: &ListGeoTasksRequest) -> ListGeoTasksResponse {
        let page = query.page.max(1);
        let page_size = query.page_size.max(1);
        let matching: Vec<GeoTask> = match self.tasks.read() {
            Ok(tasks) => tasks
                .iter()
                .rev()
                .filter(|task| matches_filter(task, query))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        };

        let total = matching.len();
        let offset = (page as usize - 1).saturating_mul(page_size as usize);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(page_size as usize)
            .collect();
        ListGeoTasksResponse {
            items,
            total: total as u64,
            page,
            page_size,
            total_pages: total.div_ceil(page_size as usize) as u32,
        }
    }

    pub fn count(&self) -> usize {
        match self.tasks.read() {
            Ok(tasks) => tasks.len(),
            Err(_) => 0,
        }
    }
}

fn matches_filter(task: &GeoTask, query: &ListGeoTasksRequest) -> bool {
    if let Some(enabled) = query.enabled {
        if task.enabled.unwrap_or(false) != enabled {
            return false;
        }
    }
    if let Some(platform_id) = &query.platform_id {
        if task.platform_id.as_ref() != Some(platform_id) {
            return false;
        }
    }
    if let Some(company_id) = &query.usr_company_id {
        if task.usr_company_id.as_ref() != Some(company_id) {
            return false;
        }
    }
    true
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn next_id() -> String {
    let count = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("geo_{}_{}", Utc::now().timestamp_millis(), count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(count: usize) -> GeoTaskStore {
        let store = GeoTaskStore::new();
        for idx in 0..count {
            let mut request = CreateGeoTaskRequest::new(format!("query {}", idx));
            request.enabled = Some(idx % 2 == 0);
            store.create(request);
        }
        store
    }

    #[test]
    fn create_assigns_id_timestamps_and_default_enabled() {
        let store = GeoTaskStore::new();
        let task = store.create(CreateGeoTaskRequest::new("coffee near me"));
        assert!(task.id.starts_with("geo_"));
        assert_eq!(task.enabled, Some(true));
        assert!(task.created_at.is_some());
        assert_eq!(task.created_at, task.updated_at);
        assert_eq!(store.get(&task.id), Some(task));
    }

    #[test]
    fn list_pages_newest_first() {
        let store = seeded(5);
        let page = store.list(&ListGeoTasksRequest {
            page: 1,
            page_size: 2,
            ..ListGeoTasksRequest::default()
        });
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        let texts: Vec<&str> = page.items.iter().map(|t| t.query_text.as_str()).collect();
        assert_eq!(texts, vec!["query 4", "query 3"]);

        let last = store.list(&ListGeoTasksRequest {
            page: 3,
            page_size: 2,
            ..ListGeoTasksRequest::default()
        });
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].query_text, "query 0");
    }

    #[test]
    fn list_filters_by_enabled() {
        let store = seeded(5);
        let page = store.list(&ListGeoTasksRequest {
            enabled: Some(false),
            ..ListGeoTasksRequest::default()
        });
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|t| t.enabled == Some(false)));
    }

    #[test]
    fn mark_executed_stamps_last_run() {
        let store = seeded(1);
        let id = store.list(&ListGeoTasksRequest::default()).items[0].id.clone();
        let task = store.mark_executed(&id).unwrap();
        assert!(task.last_run_at.is_some());
        assert!(store.mark_executed("missing").is_none());
    }
}
