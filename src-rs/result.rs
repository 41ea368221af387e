use serde::Serialize;

use crate::transport::ApiError;

/// Outcome of one dispatched call. Errors are values; callers must check
/// before trusting `Data`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryResult<T> {
    Data(T),
    Error(ApiError),
    Cancelled,
}

impl<T> QueryResult<T> {
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryResult<U> {
        match self {
            Self::Data(data) => QueryResult::Data(f(data)),
            Self::Error(err) => QueryResult::Error(err),
            Self::Cancelled => QueryResult::Cancelled,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Result<U, ApiError>) -> QueryResult<U> {
        match self {
            Self::Data(data) => QueryResult::from(f(data)),
            Self::Error(err) => QueryResult::Error(err),
            Self::Cancelled => QueryResult::Cancelled,
        }
    }

    /// `None` when the call was cancelled.
    pub fn into_result(self) -> Option<Result<T, ApiError>> {
        match self {
            Self::Data(data) => Some(Ok(data)),
            Self::Error(err) => Some(Err(err)),
            Self::Cancelled => None,
        }
    }
}

impl<T> From<Result<T, ApiError>> for QueryResult<T> {
    fn from(outcome: Result<T, ApiError>) -> Self {
        match outcome {
            Ok(data) => Self::Data(data),
            Err(err) => Self::Error(err),
        }
    }
}
