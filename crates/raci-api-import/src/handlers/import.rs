//! Import job handlers.
//!
//! - POST /admin/imports/employees — employee CSV upload + validation
//! - POST /admin/imports/projects — project CSV upload + validation
//! - GET  /admin/imports — list import jobs
//! - GET  /`admin/imports/:job_id` — import job details
//! - POST /`admin/imports/:job_id/commit` — apply the create plan

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use serde::Serialize;
use raci_core::ImportJobId;

use crate::error::ImportError;
use crate::models::{
    CommitRequest, CommitResponse, ImportJobListResponse, ImportJobResponse,
    ImportJobSummaryResponse, IssueRowResponse, ListImportJobsParams, UploadParams,
    ValidationResponse,
};
use crate::router::ImportState;
use crate::services::commit_service::CommitService;
use crate::services::csv_parser::{CsvDelimiter, CsvParseConfig};
use crate::services::import_service::ImportService;
use crate::services::reconcile::ValidationOutcome;
use raci_db::models::ImportJob;

/// Maximum allowed filename length (bytes).
const MAX_FILENAME_LENGTH: usize = 255;

/// Sanitize an uploaded filename to prevent path traversal and header
/// injection: strips directory components, filters to safe characters,
/// limits the length and falls back to a default name.
fn sanitize_filename(raw_filename: &str) -> String {
    // Extract just the filename part (remove any path components)
    let filename = raw_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(raw_filename);

    // Filter to safe characters only: alphanumeric, dash, underscore, period
    let sanitized: String = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
        .collect();

    // No hidden files, no consecutive periods
    let sanitized = sanitized.trim_start_matches('.');
    let sanitized: String = sanitized.chars().fold(String::new(), |mut acc, c| {
        if !(c == '.' && acc.ends_with('.')) {
            acc.push(c);
        }
        acc
    });

    let result = if sanitized.len() > MAX_FILENAME_LENGTH {
        sanitized[..MAX_FILENAME_LENGTH].to_string()
    } else {
        sanitized
    };

    if result.is_empty() || result == "csv" || result == ".csv" {
        "upload.csv".to_string()
    } else {
        result
    }
}

/// Read the `file` field of a multipart upload.
async fn read_upload(
    mut multipart: axum_extra::extract::Multipart,
) -> Result<(String, Vec<u8>), ImportError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ImportError::Internal(format!("Multipart read error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name.as_str() == "file" {
            file_name = field.file_name().map(std::string::ToString::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ImportError::Internal(format!("Failed to read file: {e}")))?;
            file_data = Some(bytes.to_vec());
        }
        // Unknown fields are ignored
    }

    let data = file_data.ok_or_else(|| {
        ImportError::InvalidFileType("No 'file' field found in multipart upload".to_string())
    })?;

    let fname = sanitize_filename(&file_name.unwrap_or_else(|| "upload.csv".to_string()));

    if !fname.to_lowercase().ends_with(".csv") {
        return Err(ImportError::InvalidFileType(
            "File must have a .csv extension".to_string(),
        ));
    }

    Ok((fname, data))
}

/// Build the parse config from the upload query parameters.
fn parse_config(params: &UploadParams) -> Result<CsvParseConfig, ImportError> {
    let mut config = CsvParseConfig::new();
    if let Some(delimiter) = &params.delimiter {
        config = config
            .with_delimiter(CsvDelimiter::parse(delimiter).map_err(ImportError::InvalidCsv)?);
    }
    Ok(config)
}

/// Assemble the preview response from a persisted job and its outcome.
fn validation_response<T: Serialize + Clone>(
    job: ImportJob,
    outcome: &ValidationOutcome<T>,
) -> Result<ValidationResponse, ImportError> {
    let mut issues = Vec::with_capacity(outcome.error_rows.len() + outcome.warning_rows.len());
    for row in outcome.error_rows.iter().chain(&outcome.warning_rows) {
        issues.push(IssueRowResponse {
            row_index: row.row_index as i32,
            severity: row.severity.as_str().to_string(),
            data: serde_json::to_value(&row.data)
                .map_err(|e| ImportError::Internal(format!("Failed to encode issue row: {e}")))?,
            messages: row.messages.clone(),
        });
    }

    Ok(ValidationResponse {
        job_id: job.id,
        kind: job.kind,
        status: job.status,
        file_name: job.file_name,
        total_rows: job.total_rows,
        summary: outcome.summary,
        warnings_auto_accepted: outcome.warnings_auto_accepted,
        can_import: outcome.can_import(false),
        issues,
    })
}

/// POST /admin/imports/employees
///
/// Upload an employee CSV (columns: name, department, position, manager),
/// validate it against the current reference data and persist the job.
pub async fn create_employee_import(
    Extension(state): Extension<ImportState>,
    Query(params): Query<UploadParams>,
    multipart: axum_extra::extract::Multipart,
) -> Result<Json<ValidationResponse>, ImportError> {
    let (file_name, data) = read_upload(multipart).await?;
    let config = parse_config(&params)?;

    let (job, outcome) = ImportService::validate_employee_upload(
        &state.pool,
        &file_name,
        &data,
        &config,
        state.max_file_size,
    )
    .await?;

    Ok(Json(validation_response(job, &outcome)?))
}

/// POST /admin/imports/projects
///
/// Upload a project CSV (columns: name, client, manager), validate it and
/// persist the job.
pub async fn create_project_import(
    Extension(state): Extension<ImportState>,
    Query(params): Query<UploadParams>,
    multipart: axum_extra::extract::Multipart,
) -> Result<Json<ValidationResponse>, ImportError> {
    let (file_name, data) = read_upload(multipart).await?;
    let config = parse_config(&params)?;

    let (job, outcome) = ImportService::validate_project_upload(
        &state.pool,
        &file_name,
        &data,
        &config,
        state.max_file_size,
    )
    .await?;

    Ok(Json(validation_response(job, &outcome)?))
}

/// GET /admin/imports
///
/// List import jobs with optional kind/status filters and pagination.
pub async fn list_import_jobs(
    Extension(state): Extension<ImportState>,
    Query(params): Query<ListImportJobsParams>,
) -> Result<Json<ImportJobListResponse>, ImportError> {
    let limit = params.limit.clamp(1, 100);
    let offset = params.offset.max(0);

    let (jobs, total) = ImportService::list_jobs(
        &state.pool,
        params.kind.as_deref(),
        params.status.as_deref(),
        limit,
        offset,
    )
    .await?;

    let items: Vec<ImportJobSummaryResponse> = jobs
        .into_iter()
        .map(ImportJobSummaryResponse::from)
        .collect();

    Ok(Json(ImportJobListResponse {
        items,
        total,
        limit,
        offset,
    }))
}

/// GET /`admin/imports/:job_id`
///
/// Get detailed import job status, including the outcome once committed.
pub async fn get_import_job(
    Extension(state): Extension<ImportState>,
    Path(job_id): Path<ImportJobId>,
) -> Result<Json<ImportJobResponse>, ImportError> {
    let job = ImportService::get_job(&state.pool, *job_id.as_uuid()).await?;
    Ok(Json(ImportJobResponse::from(job)))
}

/// POST /`admin/imports/:job_id/commit`
///
/// Apply the create plan of a validated job. Blocked while any error row
/// exists; warnings must be accepted unless the auto-accept heuristic
/// applied.
pub async fn commit_import_job(
    Extension(state): Extension<ImportState>,
    Path(job_id): Path<ImportJobId>,
    Json(request): Json<CommitRequest>,
) -> Result<Json<CommitResponse>, ImportError> {
    let (job, outcome) =
        CommitService::commit_job(&state.pool, *job_id.as_uuid(), request.accept_warnings).await?;

    Ok(Json(CommitResponse {
        job: ImportJobResponse::from(job),
        outcome,
    }))
}
