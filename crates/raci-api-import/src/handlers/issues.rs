//! Import issue handlers.
//!
//! - GET /`admin/imports/:job_id/issues` — list per-row issues
//! - GET /`admin/imports/:job_id/issues/download` — download error rows as CSV

use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use raci_core::ImportJobId;

use crate::error::ImportError;
use crate::models::{IssueListResponse, IssueRowResponse, ListIssuesParams};
use crate::router::ImportState;
use crate::services::export::issues_to_csv;
use crate::services::import_service::ImportService;
use crate::services::reconcile::{IssueRow, Severity};
use raci_db::models::ImportIssue;

/// GET /`admin/imports/:job_id/issues`
///
/// List per-row issues for an import job with pagination, errors first.
pub async fn list_import_issues(
    Extension(state): Extension<ImportState>,
    Path(job_id): Path<ImportJobId>,
    Query(params): Query<ListIssuesParams>,
) -> Result<Json<IssueListResponse>, ImportError> {
    // Verify the job exists
    let _ = ImportService::get_job(&state.pool, *job_id.as_uuid()).await?;

    let limit = params.limit.clamp(1, 200);
    let offset = params.offset.max(0);

    let (issues, total) = ImportIssue::list_by_job(&state.pool, *job_id.as_uuid(), limit, offset).await?;

    let items: Vec<IssueRowResponse> = issues.into_iter().map(IssueRowResponse::from).collect();

    Ok(Json(IssueListResponse {
        items,
        total,
        limit,
        offset,
    }))
}

/// GET /`admin/imports/:job_id/issues/download`
///
/// Download the job's error rows as a CSV file (row index + semicolon-joined
/// messages), offered when a batch is blocked so the user can fix the file.
pub async fn download_import_errors(
    Extension(state): Extension<ImportState>,
    Path(job_id): Path<ImportJobId>,
) -> Result<impl IntoResponse, ImportError> {
    let job = ImportService::get_job(&state.pool, *job_id.as_uuid()).await?;

    let errors = ImportIssue::list_errors_by_job(&state.pool, *job_id.as_uuid()).await?;

    let rows: Vec<IssueRow<serde_json::Value>> = errors
        .into_iter()
        .map(|issue| IssueRow {
            row_index: issue.row_index as usize,
            data: issue.row_data,
            messages: issue.messages.0,
            severity: Severity::Error,
        })
        .collect();

    let csv_text = issues_to_csv(&rows)?;

    // Sanitize filename to prevent Content-Disposition header injection
    let safe_name: String = job
        .file_name
        .replace(".csv", "")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
        .collect();
    let filename = format!(
        "{}_errors.csv",
        if safe_name.is_empty() {
            "import"
        } else {
            &safe_name
        }
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv_text,
    ))
}
