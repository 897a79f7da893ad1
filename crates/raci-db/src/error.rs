//! Database error type.

use thiserror::Error;

/// Errors produced by the database layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying sqlx query error.
    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),

    /// Connection could not be established.
    #[error("Failed to connect to database: {0}")]
    Connection(String),
}
