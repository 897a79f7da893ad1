//! Employee model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// An employee record.
///
/// Department, position and manager links are nullable: a row created as a
/// manager placeholder during import carries only a name until a later
/// import or manual edit fills in the rest.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Employee {
    /// Unique employee identifier.
    pub id: Uuid,

    /// Display name as entered by the user.
    pub name: String,

    /// Canonicalized name (lower-cased, whitespace collapsed). Unique.
    pub name_key: String,

    /// Department the employee belongs to.
    pub department_id: Option<Uuid>,

    /// Position the employee holds.
    pub position_id: Option<Uuid>,

    /// Direct manager.
    pub manager_id: Option<Uuid>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data for a full employee upsert during import commit.
#[derive(Debug, Clone)]
pub struct CreateEmployee {
    pub name: String,
    pub name_key: String,
    pub department_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
}

impl Employee {
    /// List the canonical name keys of all employees.
    pub async fn list_name_keys(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT name_key FROM employees
            ",
        )
        .fetch_all(pool)
        .await
    }

    /// Find an employee ID by canonical name key.
    pub async fn find_id_by_name_key(
        pool: &PgPool,
        name_key: &str,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT id FROM employees WHERE name_key = $1
            ",
        )
        .bind(name_key)
        .fetch_optional(pool)
        .await
    }

    /// Insert a name-only employee row if no row with the same name key
    /// exists (manager placeholder creation during import commit).
    ///
    /// Returns the employee ID and whether a new row was created.
    pub async fn insert_if_absent(
        pool: &PgPool,
        name: &str,
        name_key: &str,
    ) -> Result<(Uuid, bool), sqlx::Error> {
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r"
            INSERT INTO employees (name, name_key)
            VALUES ($1, $2)
            ON CONFLICT (name_key) DO NOTHING
            RETURNING id
            ",
        )
        .bind(name)
        .bind(name_key)
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(id) => Ok((id, true)),
            None => {
                let id: Uuid = sqlx::query_scalar(
                    r"
                    SELECT id FROM employees WHERE name_key = $1
                    ",
                )
                .bind(name_key)
                .fetch_one(pool)
                .await?;
                Ok((id, false))
            }
        }
    }

    /// Upsert a full employee record by name key.
    ///
    /// Creates the row if absent; otherwise updates the department, position
    /// and manager links (a placeholder created earlier gets filled in).
    /// Returns the employee ID and whether a new row was created.
    pub async fn upsert(pool: &PgPool, data: &CreateEmployee) -> Result<(Uuid, bool), sqlx::Error> {
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r"
            INSERT INTO employees (name, name_key, department_id, position_id, manager_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name_key) DO NOTHING
            RETURNING id
            ",
        )
        .bind(&data.name)
        .bind(&data.name_key)
        .bind(data.department_id)
        .bind(data.position_id)
        .bind(data.manager_id)
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(id) => Ok((id, true)),
            None => {
                let id: Uuid = sqlx::query_scalar(
                    r"
                    UPDATE employees
                    SET department_id = $2, position_id = $3, manager_id = $4, updated_at = NOW()
                    WHERE name_key = $1
                    RETURNING id
                    ",
                )
                .bind(&data.name_key)
                .bind(data.department_id)
                .bind(data.position_id)
                .bind(data.manager_id)
                .fetch_one(pool)
                .await?;
                Ok((id, false))
            }
        }
    }
}
