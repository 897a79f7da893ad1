//! Database layer for the raci platform.
//!
//! Provides PostgreSQL entity models, a connection pool wrapper, and
//! embedded migrations. All queries are runtime-checked `sqlx` queries
//! bound to [`models`] structs via `FromRow`.
//!
//! # Modules
//!
//! - [`pool`] - Connection pool wrapper ([`DbPool`])
//! - [`models`] - Entity models (departments, positions, employees, projects, import jobs)
//! - [`migrations`] - Embedded migration runner
//! - [`error`] - Database error type ([`DbError`])

pub mod error;
pub mod migrations;
pub mod models;
pub mod pool;

pub use error::DbError;
pub use migrations::run_migrations;
pub use pool::DbPool;
