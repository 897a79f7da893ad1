//! Project model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A project that tasks and RACI assignments hang off.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Project {
    /// Unique project identifier.
    pub id: Uuid,

    /// Display name as entered by the user.
    pub name: String,

    /// Canonicalized name (lower-cased, whitespace collapsed). Unique.
    pub name_key: String,

    /// Client the project is run for.
    pub client: Option<String>,

    /// Project manager (must reference an existing employee).
    pub manager_id: Option<Uuid>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data for a full project upsert during import commit.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub name_key: String,
    pub client: Option<String>,
    pub manager_id: Option<Uuid>,
}

impl Project {
    /// List the canonical name keys of all projects.
    pub async fn list_name_keys(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT name_key FROM projects
            ",
        )
        .fetch_all(pool)
        .await
    }

    /// Upsert a project by name key.
    ///
    /// Creates the row if absent; otherwise updates the client and manager
    /// (the "already exists" import case converges on the existing row).
    /// Returns the project ID and whether a new row was created.
    pub async fn upsert(pool: &PgPool, data: &CreateProject) -> Result<(Uuid, bool), sqlx::Error> {
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r"
            INSERT INTO projects (name, name_key, client, manager_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name_key) DO NOTHING
            RETURNING id
            ",
        )
        .bind(&data.name)
        .bind(&data.name_key)
        .bind(&data.client)
        .bind(data.manager_id)
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(id) => Ok((id, true)),
            None => {
                let id: Uuid = sqlx::query_scalar(
                    r"
                    UPDATE projects
                    SET client = $2, manager_id = $3, updated_at = NOW()
                    WHERE name_key = $1
                    RETURNING id
                    ",
                )
                .bind(&data.name_key)
                .bind(&data.client)
                .bind(data.manager_id)
                .fetch_one(pool)
                .await?;
                Ok((id, false))
            }
        }
    }
}
