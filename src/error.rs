// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the listboard service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Start-up configuration errors. The process must not start on any of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid duration {value:?}: {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("Invalid bind address {0:?}")]
    InvalidBindAddr(String),

    #[error("Invalid metrics path {0:?}")]
    InvalidMetricsPath(String),

    #[error("Metrics registry error: {0}")]
    Metrics(String),
}

/// Content store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Node {0} not found")]
    NotFound(u64),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Request-fatal failures of the submission pipeline.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Failed to persist submission: {0}")]
    Persistence(#[from] StoreError),
}

/// HTTP boundary error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound | AppError::Store(StoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            AppError::Submission(_) | AppError::Store(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
                code,
            }),
        )
            .into_response()
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
