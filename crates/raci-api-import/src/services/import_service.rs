//! Import service: upload validation, snapshot loading, job persistence.
//!
//! Glues the pure engine (csv decoding, reconciliation) to storage: an
//! upload is decoded, validated against a freshly loaded reference
//! snapshot, and the classification is persisted as an `import_jobs` row
//! plus its `import_issues`. The accepted rows are stored on the job as
//! the create plan, so the commit endpoint can apply them later without
//! re-parsing the upload.

use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ImportError;
use crate::services::csv_parser::{self, CsvParseConfig, CsvParseError, DEFAULT_MAX_FILE_SIZE};
use crate::services::reconcile::{
    validate_employee_rows, validate_project_rows, IssueRow, ValidationOutcome,
};
use crate::snapshot::ReferenceSnapshot;
use crate::validation::{EmployeeRow, ProjectRow};
use raci_db::models::{
    CreateImportIssue, CreateImportJob, Department, Employee, ImportIssue, ImportJob, Position,
    Project,
};

/// Import kind discriminators stored on the job row.
pub const KIND_EMPLOYEES: &str = "employees";
pub const KIND_PROJECTS: &str = "projects";

/// Import service for the validate-then-commit lifecycle.
pub struct ImportService;

impl ImportService {
    /// Validate an uploaded employee CSV and persist the job.
    pub async fn validate_employee_upload(
        pool: &PgPool,
        file_name: &str,
        file_data: &[u8],
        config: &CsvParseConfig,
        max_file_size: usize,
    ) -> Result<(ImportJob, ValidationOutcome<EmployeeRow>), ImportError> {
        let raw_rows = decode_upload(file_data, config, max_file_size)?;
        let snapshot = load_reference_snapshot(pool).await?;
        let outcome = validate_employee_rows(&raw_rows, &snapshot);

        let job = persist_validation(
            pool,
            KIND_EMPLOYEES,
            file_name,
            file_data,
            raw_rows.len(),
            &outcome,
        )
        .await?;

        Ok((job, outcome))
    }

    /// Validate an uploaded project CSV and persist the job.
    pub async fn validate_project_upload(
        pool: &PgPool,
        file_name: &str,
        file_data: &[u8],
        config: &CsvParseConfig,
        max_file_size: usize,
    ) -> Result<(ImportJob, ValidationOutcome<ProjectRow>), ImportError> {
        let raw_rows = decode_upload(file_data, config, max_file_size)?;
        let snapshot = load_reference_snapshot(pool).await?;
        let outcome = validate_project_rows(&raw_rows, &snapshot);

        let job = persist_validation(
            pool,
            KIND_PROJECTS,
            file_name,
            file_data,
            raw_rows.len(),
            &outcome,
        )
        .await?;

        Ok((job, outcome))
    }

    /// Get an import job by ID.
    pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<ImportJob, ImportError> {
        ImportJob::find_by_id(pool, job_id)
            .await?
            .ok_or(ImportError::JobNotFound)
    }

    /// List import jobs with optional kind/status filters and pagination.
    pub async fn list_jobs(
        pool: &PgPool,
        kind: Option<&str>,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ImportJob>, i64), ImportError> {
        let (jobs, total) = ImportJob::list(pool, kind, status, limit, offset).await?;
        Ok((jobs, total))
    }
}

/// Size/emptiness checks plus CSV decoding.
fn decode_upload(
    file_data: &[u8],
    config: &CsvParseConfig,
    max_file_size: usize,
) -> Result<Vec<Vec<String>>, ImportError> {
    if file_data.is_empty() {
        return Err(ImportError::InvalidFileType("File is empty".to_string()));
    }

    let max_file_size = if max_file_size == 0 {
        DEFAULT_MAX_FILE_SIZE
    } else {
        max_file_size
    };
    if file_data.len() > max_file_size {
        return Err(ImportError::FileTooLarge(format!(
            "File size {} bytes exceeds maximum of {} bytes",
            file_data.len(),
            max_file_size
        )));
    }

    csv_parser::parse_csv(file_data, config).map_err(|e| match e {
        CsvParseError::TooManyRows(_) => ImportError::TooManyRows(e.to_string()),
        other => ImportError::InvalidCsv(other.to_string()),
    })
}

/// Load the reference snapshot the validators compare against.
///
/// Taken fresh for every validation run; a job validated before other
/// imports committed sees the pre-commit state (the accepted race — see
/// the snapshot module docs).
pub async fn load_reference_snapshot(pool: &PgPool) -> Result<ReferenceSnapshot, ImportError> {
    let departments = Department::list_active_name_keys(pool).await?;
    let positions = Position::list_active_name_keys(pool).await?;
    let employees = Employee::list_name_keys(pool).await?;
    let projects = Project::list_name_keys(pool).await?;

    Ok(ReferenceSnapshot::from_names(
        departments,
        positions,
        employees,
        projects,
    ))
}

/// Persist the job record and its warning/error issue rows.
async fn persist_validation<T: Serialize + Clone>(
    pool: &PgPool,
    kind: &str,
    file_name: &str,
    file_data: &[u8],
    total_rows: usize,
    outcome: &ValidationOutcome<T>,
) -> Result<ImportJob, ImportError> {
    let file_hash = {
        let mut hasher = Sha256::new();
        hasher.update(file_data);
        hex::encode(hasher.finalize())
    };

    let create_plan = serde_json::to_value(outcome.create_plan())
        .map_err(|e| ImportError::Internal(format!("Failed to encode create plan: {e}")))?;

    let job = ImportJob::create(
        pool,
        CreateImportJob {
            kind: kind.to_string(),
            file_name: file_name.to_string(),
            file_hash,
            file_size_bytes: file_data.len() as i64,
            total_rows: total_rows as i32,
            valid_count: outcome.valid_rows.len() as i32,
            warning_count: outcome.warning_rows.len() as i32,
            error_count: outcome.error_rows.len() as i32,
            warnings_auto_accepted: outcome.warnings_auto_accepted,
            create_plan,
        },
    )
    .await?;

    let mut issues = Vec::with_capacity(outcome.warning_rows.len() + outcome.error_rows.len());
    collect_issues(&mut issues, job.id, &outcome.error_rows)?;
    collect_issues(&mut issues, job.id, &outcome.warning_rows)?;
    ImportIssue::create_batch(pool, &issues).await?;

    tracing::info!(
        job_id = %job.id,
        kind = kind,
        file_name = file_name,
        total_rows = total_rows,
        valid = outcome.valid_rows.len(),
        warnings = outcome.warning_rows.len(),
        errors = outcome.error_rows.len(),
        "Import upload validated"
    );

    Ok(job)
}

fn collect_issues<T: Serialize>(
    into: &mut Vec<CreateImportIssue>,
    job_id: Uuid,
    rows: &[IssueRow<T>],
) -> Result<(), ImportError> {
    for row in rows {
        let row_data = serde_json::to_value(&row.data)
            .map_err(|e| ImportError::Internal(format!("Failed to encode issue row: {e}")))?;
        into.push(CreateImportIssue {
            job_id,
            row_index: row.row_index as i32,
            severity: row.severity.as_str().to_string(),
            row_data,
            messages: row.messages.clone(),
        });
    }
    Ok(())
}
