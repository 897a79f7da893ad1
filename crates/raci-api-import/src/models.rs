//! API request/response models for the import endpoints.
//!
//! All models carry serde derives; `utoipa` schema derives are enabled by
//! the `openapi` feature.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::reconcile::ImportSummary;

/// Response returned when an upload has been validated.
///
/// The job is persisted in state `validated`; the caller inspects the
/// preview and then commits (or abandons) the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ValidationResponse {
    /// Job identifier for the follow-up commit / issue queries.
    pub job_id: Uuid,
    /// Import kind: employees, projects.
    pub kind: String,
    /// Job status (always "validated" here).
    pub status: String,
    /// Original uploaded filename.
    pub file_name: String,
    /// Total data rows detected in the file.
    pub total_rows: i32,
    /// Classification and creation counts.
    pub summary: ImportSummary,
    /// True when every warning is creation-intent only.
    pub warnings_auto_accepted: bool,
    /// Whether commit would currently be allowed without further input.
    pub can_import: bool,
    /// Warning and error rows with their full message lists.
    pub issues: Vec<IssueRowResponse>,
}

/// A single classified row in API form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IssueRowResponse {
    /// 1-based index over data rows.
    pub row_index: i32,
    /// Issue severity: error, warning.
    pub severity: String,
    /// The normalized row the issue refers to.
    pub data: serde_json::Value,
    /// Every message attached to the row.
    pub messages: Vec<String>,
}

impl From<raci_db::models::ImportIssue> for IssueRowResponse {
    fn from(issue: raci_db::models::ImportIssue) -> Self {
        Self {
            row_index: issue.row_index,
            severity: issue.severity,
            data: issue.row_data,
            messages: issue.messages.0,
        }
    }
}

/// Paginated list of issues for a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IssueListResponse {
    pub items: Vec<IssueRowResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Full import job details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImportJobResponse {
    pub id: Uuid,
    pub kind: String,
    pub status: String,
    pub file_name: String,
    pub file_hash: String,
    pub file_size_bytes: i64,
    pub total_rows: i32,
    pub valid_count: i32,
    pub warning_count: i32,
    pub error_count: i32,
    pub warnings_auto_accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ImportOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<raci_db::models::ImportJob> for ImportJobResponse {
    fn from(job: raci_db::models::ImportJob) -> Self {
        let outcome = ImportOutcome::from_job(&job);
        Self {
            id: job.id,
            kind: job.kind,
            status: job.status,
            file_name: job.file_name,
            file_hash: job.file_hash,
            file_size_bytes: job.file_size_bytes,
            total_rows: job.total_rows,
            valid_count: job.valid_count,
            warning_count: job.warning_count,
            error_count: job.error_count,
            warnings_auto_accepted: job.warnings_auto_accepted,
            outcome,
            error_message: job.error_message,
            committed_at: job.committed_at,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// Summary view of an import job for list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImportJobSummaryResponse {
    pub id: Uuid,
    pub kind: String,
    pub status: String,
    pub file_name: String,
    pub total_rows: i32,
    pub valid_count: i32,
    pub warning_count: i32,
    pub error_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<raci_db::models::ImportJob> for ImportJobSummaryResponse {
    fn from(job: raci_db::models::ImportJob) -> Self {
        Self {
            id: job.id,
            kind: job.kind,
            status: job.status,
            file_name: job.file_name,
            total_rows: job.total_rows,
            valid_count: job.valid_count,
            warning_count: job.warning_count,
            error_count: job.error_count,
            created_at: job.created_at,
        }
    }
}

/// Paginated list of import jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImportJobListResponse {
    pub items: Vec<ImportJobSummaryResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Counts returned once a create plan has been applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// Outcome of an employee import.
    Employees {
        departments_created: i32,
        positions_created: i32,
        managers_created: i32,
        employees_created: i32,
    },
    /// Outcome of a project import.
    Projects { projects_created: i32 },
}

impl ImportOutcome {
    /// Reconstruct the outcome from a committed job's counters, if present.
    #[must_use]
    pub fn from_job(job: &raci_db::models::ImportJob) -> Option<Self> {
        match job.kind.as_str() {
            "employees" => Some(ImportOutcome::Employees {
                departments_created: job.departments_created?,
                positions_created: job.positions_created?,
                managers_created: job.managers_created?,
                employees_created: job.employees_created?,
            }),
            "projects" => Some(ImportOutcome::Projects {
                projects_created: job.projects_created?,
            }),
            _ => None,
        }
    }
}

/// Request body for committing a validated job.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CommitRequest {
    /// Explicit acknowledgment of the batch's warnings. Not required when
    /// the auto-accept heuristic applied or the batch has no warnings.
    #[serde(default)]
    pub accept_warnings: bool,
}

/// Response after committing a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CommitResponse {
    pub job: ImportJobResponse,
    pub outcome: ImportOutcome,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query parameters for the upload endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadParams {
    /// Field delimiter: "," / ";" / "\t" / "|" or comma/semicolon/tab/pipe.
    pub delimiter: Option<String>,
}

/// Query parameters for listing import jobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ListImportJobsParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub kind: Option<String>,
    pub status: Option<String>,
}

fn default_limit() -> i64 {
    20
}

/// Query parameters for listing issues.
#[derive(Debug, Clone, Deserialize)]
pub struct ListIssuesParams {
    #[serde(default = "default_issue_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_issue_limit() -> i64 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_outcome_serializes_tagged() {
        let outcome = ImportOutcome::Projects {
            projects_created: 3,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"kind\":\"projects\""));
        assert!(json.contains("\"projects_created\":3"));
    }

    #[test]
    fn test_commit_request_defaults() {
        let req: CommitRequest = serde_json::from_str("{}").unwrap();
        assert!(!req.accept_warnings);
    }
}
