//! Import issue model.
//!
//! Records per-row warnings and errors from import validation runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A per-row issue (warning or error) from an import validation run.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImportIssue {
    /// Unique issue identifier.
    pub id: Uuid,

    /// Parent import job.
    pub job_id: Uuid,

    /// 1-based index over data rows.
    pub row_index: i32,

    /// Issue severity: error, warning.
    pub severity: String,

    /// The normalized row the issue refers to.
    pub row_data: serde_json::Value,

    /// Every message attached to the row. The full list is retained;
    /// truncation for display is a UI concern.
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub messages: Json<Vec<String>>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a single import issue.
#[derive(Debug, Clone)]
pub struct CreateImportIssue {
    pub job_id: Uuid,
    pub row_index: i32,
    pub severity: String,
    pub row_data: serde_json::Value,
    pub messages: Vec<String>,
}

impl ImportIssue {
    /// Record a batch of issues for a job.
    pub async fn create_batch(
        pool: &PgPool,
        issues: &[CreateImportIssue],
    ) -> Result<u64, sqlx::Error> {
        if issues.is_empty() {
            return Ok(0);
        }

        let mut count = 0u64;
        for issue in issues {
            sqlx::query(
                r"
                INSERT INTO import_issues (job_id, row_index, severity, row_data, messages)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(issue.job_id)
            .bind(issue.row_index)
            .bind(&issue.severity)
            .bind(&issue.row_data)
            .bind(Json(&issue.messages))
            .execute(pool)
            .await?;
            count += 1;
        }

        Ok(count)
    }

    /// List issues for a job with pagination, errors before warnings,
    /// file order within each severity.
    pub async fn list_by_job(
        pool: &PgPool,
        job_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let items = sqlx::query_as(
            r"
            SELECT * FROM import_issues
            WHERE job_id = $1
            ORDER BY severity ASC, row_index ASC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(job_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM import_issues
            WHERE job_id = $1
            ",
        )
        .bind(job_id)
        .fetch_one(pool)
        .await?;

        Ok((items, total))
    }

    /// List all error-severity issues for a job in file order (for the CSV
    /// download).
    pub async fn list_errors_by_job(pool: &PgPool, job_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM import_issues
            WHERE job_id = $1 AND severity = 'error'
            ORDER BY row_index ASC
            ",
        )
        .bind(job_id)
        .fetch_all(pool)
        .await
    }

    /// Count issues for a job.
    pub async fn count_by_job(pool: &PgPool, job_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM import_issues
            WHERE job_id = $1
            ",
        )
        .bind(job_id)
        .fetch_one(pool)
        .await
    }
}
