//! Position (job title) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A position (job title) that RACI roles are assigned to.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Position {
    /// Unique position identifier.
    pub id: Uuid,

    /// Display name as entered by the user.
    pub name: String,

    /// Canonicalized name (lower-cased, whitespace collapsed). Unique.
    pub name_key: String,

    /// Inactive positions are excluded from import matching.
    pub is_active: bool,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Position {
    /// List the canonical name keys of all active positions.
    pub async fn list_active_name_keys(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT name_key FROM positions
            WHERE is_active = TRUE
            ",
        )
        .fetch_all(pool)
        .await
    }

    /// Find a position by its canonical name key.
    pub async fn find_by_name_key(
        pool: &PgPool,
        name_key: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM positions
            WHERE name_key = $1
            ",
        )
        .bind(name_key)
        .fetch_optional(pool)
        .await
    }

    /// Insert a position if no row with the same name key exists.
    ///
    /// Returns the position ID and whether a new row was created.
    pub async fn insert_if_absent(
        pool: &PgPool,
        name: &str,
        name_key: &str,
    ) -> Result<(Uuid, bool), sqlx::Error> {
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r"
            INSERT INTO positions (name, name_key)
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
                    SELECT id FROM positions WHERE name_key = $1
                    ",
                )
                .bind(name_key)
                .fetch_one(pool)
                .await?;
                Ok((id, false))
            }
        }
    }
}
