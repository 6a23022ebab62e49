//! # Errors
//! Failure taxonomy of the service and its mapping onto HTTP responses.
//!
//! Row-level timestamp failures are deliberately absent here: they are a
//! data-quality policy handled in [`crate::timestamp`], not an error.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Body returned by `/data` when the dataset file is absent.
pub const DATASET_NOT_FOUND_MSG: &str = "CSV file not found!";

#[derive(Debug, thiserror::Error)]
pub enum TrendsError {
    #[error("dataset not found at {}", path.display())]
    DatasetNotFound { path: PathBuf },

    #[error("{0}")]
    DatasetParse(String),

    #[error("aggregation failed: {0}")]
    Aggregation(String),

    #[error("asset not found at {}", path.display())]
    AssetNotFound { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<csv::Error> for TrendsError {
    fn from(e: csv::Error) -> Self {
        TrendsError::DatasetParse(e.to_string())
    }
}

impl TrendsError {
    pub fn status(&self) -> StatusCode {
        match self {
            TrendsError::DatasetNotFound { .. } | TrendsError::AssetNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TrendsError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            TrendsError::DatasetNotFound { .. } => {
                (status, Json(json!({ "error": DATASET_NOT_FOUND_MSG }))).into_response()
            }
            // Same shape a missing file gets from the static file service.
            TrendsError::AssetNotFound { .. } => (status, "Not Found").into_response(),
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}
