//! Error types for the import API.
//!
//! Uses RFC 7807 Problem Details for HTTP APIs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base URL for error type URIs.
const ERROR_BASE_URL: &str = "https://raci.app/errors/import";

/// RFC 7807 Problem Details structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI identifying the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// Short human-readable summary.
    pub title: String,

    /// HTTP status code.
    pub status: u16,

    /// Human-readable explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI of the specific occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// Create a new `ProblemDetails` instance.
    #[must_use]
    pub fn new(error_type: &str, title: &str, status: StatusCode) -> Self {
        Self {
            error_type: format!("{ERROR_BASE_URL}/{error_type}"),
            title: title.to_string(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    /// Add detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Import API errors.
#[derive(Debug, Error)]
pub enum ImportError {
    /// File exceeds maximum allowed size.
    #[error("File too large: {0}")]
    FileTooLarge(String),

    /// CSV contains too many data rows.
    #[error("Too many rows: {0}")]
    TooManyRows(String),

    /// Uploaded file is not a valid CSV upload.
    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    /// CSV decoding failed.
    #[error("Invalid CSV: {0}")]
    InvalidCsv(String),

    /// Import job not found.
    #[error("Job not found")]
    JobNotFound,

    /// The job is not in a state that allows the requested transition.
    #[error("Invalid job state: {0}")]
    InvalidJobState(String),

    /// The batch cannot be committed (error rows present, or nothing to
    /// import).
    #[error("Import blocked: {0}")]
    ImportBlocked(String),

    /// The batch carries warnings that have not been accepted.
    #[error("Warnings not accepted")]
    WarningsNotAccepted,

    /// Applying the create plan failed; the message is passed through
    /// from the creation layer.
    #[error("Commit failed: {0}")]
    CommitFailed(String),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ImportError {
    /// Convert to `ProblemDetails`.
    pub fn to_problem_details(&self) -> ProblemDetails {
        match self {
            ImportError::FileTooLarge(msg) => ProblemDetails::new(
                "file-too-large",
                "File Too Large",
                StatusCode::PAYLOAD_TOO_LARGE,
            )
            .with_detail(msg.clone()),

            ImportError::TooManyRows(msg) => {
                ProblemDetails::new("too-many-rows", "Too Many Rows", StatusCode::BAD_REQUEST)
                    .with_detail(msg.clone())
            }

            ImportError::InvalidFileType(msg) => ProblemDetails::new(
                "invalid-file-type",
                "Invalid File Type",
                StatusCode::BAD_REQUEST,
            )
            .with_detail(msg.clone()),

            ImportError::InvalidCsv(msg) => {
                ProblemDetails::new("invalid-csv", "Invalid CSV", StatusCode::BAD_REQUEST)
                    .with_detail(msg.clone())
            }

            ImportError::JobNotFound => {
                ProblemDetails::new("job-not-found", "Job Not Found", StatusCode::NOT_FOUND)
                    .with_detail("The requested import job was not found.")
            }

            ImportError::InvalidJobState(msg) => ProblemDetails::new(
                "invalid-job-state",
                "Invalid Job State",
                StatusCode::CONFLICT,
            )
            .with_detail(msg.clone()),

            ImportError::ImportBlocked(msg) => {
                ProblemDetails::new("import-blocked", "Import Blocked", StatusCode::CONFLICT)
                    .with_detail(msg.clone())
            }

            ImportError::WarningsNotAccepted => ProblemDetails::new(
                "warnings-not-accepted",
                "Warnings Not Accepted",
                StatusCode::BAD_REQUEST,
            )
            .with_detail(
                "The batch carries warnings; set accept_warnings to true to proceed.",
            ),

            ImportError::CommitFailed(msg) => {
                tracing::error!(error = %msg, "Import commit failed");
                ProblemDetails::new(
                    "commit-failed",
                    "Commit Failed",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .with_detail(msg.clone())
            }

            ImportError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal import error");
                ProblemDetails::new(
                    "internal-error",
                    "Internal Server Error",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .with_detail("An internal error occurred. Please try again later.")
            }

            ImportError::Database(err) => {
                tracing::error!(error = %err, "Database error in import");
                ProblemDetails::new(
                    "database-error",
                    "Database Error",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .with_detail("A database error occurred. Please try again later.")
            }
        }
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ImportError::FileTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ImportError::TooManyRows(_) => StatusCode::BAD_REQUEST,
            ImportError::InvalidFileType(_) => StatusCode::BAD_REQUEST,
            ImportError::InvalidCsv(_) => StatusCode::BAD_REQUEST,
            ImportError::JobNotFound => StatusCode::NOT_FOUND,
            ImportError::InvalidJobState(_) => StatusCode::CONFLICT,
            ImportError::ImportBlocked(_) => StatusCode::CONFLICT,
            ImportError::WarningsNotAccepted => StatusCode::BAD_REQUEST,
            ImportError::CommitFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ImportError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ImportError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let problem = self.to_problem_details();

        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        response
    }
}
