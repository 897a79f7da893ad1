//! Router and state for the import API.
//!
//! Provides the `ImportState` struct and `import_router()` function that
//! creates the Axum router for all import-related endpoints.

use axum::{
    routing::{get, post},
    Extension, Router,
};
use sqlx::PgPool;

use crate::handlers;
use crate::services::csv_parser::DEFAULT_MAX_FILE_SIZE;

/// Shared state for import routes.
#[derive(Clone)]
pub struct ImportState {
    /// Database connection pool.
    pub pool: PgPool,
    /// Maximum accepted upload size in bytes.
    pub max_file_size: usize,
}

impl ImportState {
    /// Create a new `ImportState` with the default upload size limit.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Override the upload size limit.
    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: usize) -> Self {
        self.max_file_size = max_file_size;
        self
    }
}

/// Create the import router.
///
/// Routes:
/// - POST   /admin/imports/employees                 — Upload + validate employee CSV
/// - POST   /admin/imports/projects                  — Upload + validate project CSV
/// - GET    /admin/imports                           — List jobs
/// - GET    /`admin/imports/:job_id`                   — Get job
/// - GET    /`admin/imports/:job_id/issues`            — List issues
/// - GET    /`admin/imports/:job_id/issues/download`   — Download error CSV
/// - POST   /`admin/imports/:job_id/commit`            — Apply the create plan
///
/// Authentication is out of scope here; the deployment layers its own auth
/// middleware over the `/admin` routes.
pub fn import_router(state: ImportState) -> Router {
    Router::new()
        // CSV upload + validation
        .route(
            "/admin/imports/employees",
            post(handlers::import::create_employee_import),
        )
        .route(
            "/admin/imports/projects",
            post(handlers::import::create_project_import),
        )
        // Job listing and details
        .route("/admin/imports", get(handlers::import::list_import_jobs))
        .route(
            "/admin/imports/:job_id",
            get(handlers::import::get_import_job),
        )
        // Issue listing and download
        .route(
            "/admin/imports/:job_id/issues",
            get(handlers::issues::list_import_issues),
        )
        .route(
            "/admin/imports/:job_id/issues/download",
            get(handlers::issues::download_import_errors),
        )
        // Commit
        .route(
            "/admin/imports/:job_id/commit",
            post(handlers::import::commit_import_job),
        )
        .layer(Extension(state))
}
