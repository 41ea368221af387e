//! Local checks run before a request is dispatched.

use serde::Serialize;
use thiserror::Error;

use super::types::{CreateGeoTaskRequest, ListGeoTasksRequest};

pub const QUERY_TEXT_MAX_CHARS: usize = 500;
pub const SCHEDULE_CRON_MAX_CHARS: usize = 100;

/// Rejected input, surfaced inline and never sent over the wire.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum ValidationError {
    /// `query_text` is empty or only whitespace.
    #[error("query text is required")]
    QueryTextRequired,

    /// `query_text` exceeds the character limit.
    #[error("query text must be {max} characters or less (got {len})")]
    QueryTextTooLong { len: usize, max: usize },

    /// `schedule_cron` exceeds the character limit.
    #[error("schedule cron must be {max} characters or less (got {len})")]
    ScheduleCronTooLong { len: usize, max: usize },

    /// `page` must be 1 or greater.
    #[error("page must be at least 1")]
    InvalidPage,

    /// `page_size` must be 1 or greater.
    #[error("page size must be at least 1")]
    InvalidPageSize,
}

pub fn validate_create(request: &CreateGeoTaskRequest) -> Result<(), ValidationError> {
    if request.query_text.trim().is_empty() {
        return Err(ValidationError::QueryTextRequired);
    }
    let len = request.query_text.chars().count();
    if len > QUERY_TEXT_MAX_CHARS {
        return Err(ValidationError::QueryTextTooLong {
            len,
            max: QUERY_TEXT_MAX_CHARS,
        });
    }
    if let Some(cron) = &request.schedule_cron {
        let len = cron.chars().count();
        if len > SCHEDULE_CRON_MAX_CHARS {
            return Err(ValidationError::ScheduleCronTooLong {
                len,
                max: SCHEDULE_CRON_MAX_CHARS,
            });
        }
    }
    Ok(())
}

pub fn validate_list(request: &ListGeoTasksRequest) -> Result<(), ValidationError> {
    if request.page == 0 {
        return Err(ValidationError::InvalidPage);
    }
    if request.page_size == 0 {
        return Err(ValidationError::InvalidPageSize);
    }
    Ok(())
}
