//! Import job model.
//!
//! Represents a single spreadsheet upload and its validate-then-commit
//! lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// An import job record.
///
/// Created in status `validated` with the classification counts and the
/// create plan (accepted rows); transitions to `committed` once the plan has
/// been applied, or `failed` if applying it errored.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImportJob {
    /// Unique job identifier.
    pub id: Uuid,

    /// Import kind: employees, projects.
    pub kind: String,

    /// Job lifecycle state: validated, committed, failed.
    pub status: String,

    /// Original uploaded filename.
    pub file_name: String,

    /// SHA-256 hex hash of the uploaded file.
    pub file_hash: String,

    /// Size of the uploaded file in bytes.
    pub file_size_bytes: i64,

    /// Total data rows (blank rows excluded).
    pub total_rows: i32,

    /// Rows classified valid.
    pub valid_count: i32,

    /// Rows classified warning.
    pub warning_count: i32,

    /// Rows classified error.
    pub error_count: i32,

    /// Whether every warning was creation-intent, so acceptance was implied.
    pub warnings_auto_accepted: bool,

    /// Accepted rows (valid + warning) in file order, as JSON.
    pub create_plan: serde_json::Value,

    /// Departments created at commit (employee imports).
    pub departments_created: Option<i32>,

    /// Positions created at commit (employee imports).
    pub positions_created: Option<i32>,

    /// Manager placeholders created at commit (employee imports).
    pub managers_created: Option<i32>,

    /// Employees created at commit (employee imports).
    pub employees_created: Option<i32>,

    /// Projects created at commit (project imports).
    pub projects_created: Option<i32>,

    /// System-level error (for failed status).
    pub error_message: Option<String>,

    /// When the create plan was applied.
    pub committed_at: Option<DateTime<Utc>>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new import job.
#[derive(Debug)]
pub struct CreateImportJob {
    pub kind: String,
    pub file_name: String,
    pub file_hash: String,
    pub file_size_bytes: i64,
    pub total_rows: i32,
    pub valid_count: i32,
    pub warning_count: i32,
    pub error_count: i32,
    pub warnings_auto_accepted: bool,
    pub create_plan: serde_json::Value,
}

/// Entity-creation counts recorded when a job is committed.
///
/// Employee imports fill the first four counters; project imports fill only
/// `projects`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOutcomeCounts {
    pub departments: Option<i32>,
    pub positions: Option<i32>,
    pub managers: Option<i32>,
    pub employees: Option<i32>,
    pub projects: Option<i32>,
}

impl ImportJob {
    /// Create a new import job record in status `validated`.
    pub async fn create(pool: &PgPool, data: CreateImportJob) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO import_jobs
                (kind, file_name, file_hash, file_size_bytes, total_rows,
                 valid_count, warning_count, error_count, warnings_auto_accepted, create_plan)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            ",
        )
        .bind(&data.kind)
        .bind(&data.file_name)
        .bind(&data.file_hash)
        .bind(data.file_size_bytes)
        .bind(data.total_rows)
        .bind(data.valid_count)
        .bind(data.warning_count)
        .bind(data.error_count)
        .bind(data.warnings_auto_accepted)
        .bind(&data.create_plan)
        .fetch_one(pool)
        .await
    }

    /// Find a job by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM import_jobs
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List import jobs with optional kind/status filters and pagination.
    pub async fn list(
        pool: &PgPool,
        kind: Option<&str>,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let jobs = sqlx::query_as(
            r"
            SELECT * FROM import_jobs
            WHERE ($1::text IS NULL OR kind = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(kind)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM import_jobs
            WHERE ($1::text IS NULL OR kind = $1)
              AND ($2::text IS NULL OR status = $2)
            ",
        )
        .bind(kind)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok((jobs, total))
    }

    /// Mark a job as committed with its creation counts.
    ///
    /// Only transitions jobs in the `validated` state; returns `None` if the
    /// job does not exist or was already committed.
    pub async fn mark_committed(
        pool: &PgPool,
        id: Uuid,
        counts: ImportOutcomeCounts,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            UPDATE import_jobs
            SET status = 'committed',
                committed_at = NOW(),
                departments_created = $2,
                positions_created = $3,
                managers_created = $4,
                employees_created = $5,
                projects_created = $6,
                updated_at = NOW()
            WHERE id = $1 AND status = 'validated'
            RETURNING *
            ",
        )
        .bind(id)
        .bind(counts.departments)
        .bind(counts.positions)
        .bind(counts.managers)
        .bind(counts.employees)
        .bind(counts.projects)
        .fetch_optional(pool)
        .await
    }

    /// Mark a job as failed with an error message.
    pub async fn mark_failed(
        pool: &PgPool,
        id: Uuid,
        error_message: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            UPDATE import_jobs
            SET status = 'failed', error_message = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(error_message)
        .fetch_optional(pool)
        .await
    }
}
