//! Commit service: applies a validated job's create plan.
//!
//! Commit is gated by the same rule the classifier exposes: zero error
//! rows, at least one accepted row, warnings accepted (explicitly or via
//! the auto-accept heuristic). Creation is idempotent per name key, so
//! re-running a commit that failed halfway converges instead of
//! duplicating rows — this is also what tolerates the accepted race with
//! a concurrent import creating the same names (no rollback is attempted,
//! matching the creation API contract).

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ImportError;
use crate::models::ImportOutcome;
use crate::normalize::normalize_key;
use crate::services::import_service::{KIND_EMPLOYEES, KIND_PROJECTS};
use crate::validation::{EmployeeRow, ProjectRow};
use raci_db::models::{
    CreateEmployee, CreateProject, Department, Employee, ImportJob, ImportOutcomeCounts, Position,
    Project,
};

/// Commit service for applying create plans.
pub struct CommitService;

impl CommitService {
    /// Apply the create plan of a validated job.
    ///
    /// Returns the updated job and the creation counts. A failure while
    /// applying the plan marks the job `failed` and passes the message
    /// through to the caller.
    pub async fn commit_job(
        pool: &PgPool,
        job_id: Uuid,
        accept_warnings: bool,
    ) -> Result<(ImportJob, ImportOutcome), ImportError> {
        let job = ImportJob::find_by_id(pool, job_id)
            .await?
            .ok_or(ImportError::JobNotFound)?;

        if job.status != "validated" {
            return Err(ImportError::InvalidJobState(format!(
                "job is '{}', expected 'validated'",
                job.status
            )));
        }

        // No partial import: any error row blocks the whole batch.
        if job.error_count > 0 {
            return Err(ImportError::ImportBlocked(format!(
                "the batch contains {} error row(s); fix the file and upload again",
                job.error_count
            )));
        }

        if job.valid_count + job.warning_count == 0 {
            return Err(ImportError::ImportBlocked(
                "the batch contains no importable rows".to_string(),
            ));
        }

        if job.warning_count > 0 && !accept_warnings && !job.warnings_auto_accepted {
            return Err(ImportError::WarningsNotAccepted);
        }

        let applied = match job.kind.as_str() {
            KIND_EMPLOYEES => apply_employee_plan(pool, &job).await,
            KIND_PROJECTS => apply_project_plan(pool, &job).await,
            other => Err(ImportError::Internal(format!(
                "unknown import kind '{other}'"
            ))),
        };

        match applied {
            Ok((counts, outcome)) => {
                let updated = ImportJob::mark_committed(pool, job.id, counts)
                    .await?
                    .ok_or_else(|| {
                        ImportError::InvalidJobState(
                            "job was committed concurrently".to_string(),
                        )
                    })?;

                tracing::info!(
                    job_id = %job.id,
                    kind = %updated.kind,
                    "Import job committed"
                );

                Ok((updated, outcome))
            }
            Err(e) => {
                let message = e.to_string();
                let _ = ImportJob::mark_failed(pool, job.id, &message).await;
                tracing::error!(job_id = %job.id, error = %message, "Import commit failed");
                Err(e)
            }
        }
    }
}

/// Apply an employee create plan: departments, positions and manager
/// placeholders first, then the employee rows themselves. Repeated names
/// converge on the first created row.
async fn apply_employee_plan(
    pool: &PgPool,
    job: &ImportJob,
) -> Result<(ImportOutcomeCounts, ImportOutcome), ImportError> {
    let plan: Vec<EmployeeRow> = serde_json::from_value(job.create_plan.clone())
        .map_err(|e| ImportError::Internal(format!("Corrupt create plan: {e}")))?;

    let mut departments_created = 0;
    let mut positions_created = 0;
    let mut managers_created = 0;
    let mut employees_created = 0;

    for row in &plan {
        let department_key = normalize_key(&row.department);
        let (department_id, created) =
            Department::insert_if_absent(pool, &row.department, &department_key).await?;
        departments_created += i32::from(created);

        let position_key = normalize_key(&row.position);
        let (position_id, created) =
            Position::insert_if_absent(pool, &row.position, &position_key).await?;
        positions_created += i32::from(created);

        let manager_id = match &row.manager {
            Some(manager) => {
                let manager_key = normalize_key(manager);
                let (id, created) = Employee::insert_if_absent(pool, manager, &manager_key).await?;
                managers_created += i32::from(created);
                Some(id)
            }
            None => None,
        };

        let (_, created) = Employee::upsert(
            pool,
            &CreateEmployee {
                name: row.name.clone(),
                name_key: row.name_key(),
                department_id: Some(department_id),
                position_id: Some(position_id),
                manager_id,
            },
        )
        .await?;
        employees_created += i32::from(created);
    }

    let counts = ImportOutcomeCounts {
        departments: Some(departments_created),
        positions: Some(positions_created),
        managers: Some(managers_created),
        employees: Some(employees_created),
        projects: None,
    };
    let outcome = ImportOutcome::Employees {
        departments_created,
        positions_created,
        managers_created,
        employees_created,
    };
    Ok((counts, outcome))
}

/// Apply a project create plan. Managers were validated to exist; a
/// manager deleted between validate and commit fails the commit with a
/// pass-through message.
async fn apply_project_plan(
    pool: &PgPool,
    job: &ImportJob,
) -> Result<(ImportOutcomeCounts, ImportOutcome), ImportError> {
    let plan: Vec<ProjectRow> = serde_json::from_value(job.create_plan.clone())
        .map_err(|e| ImportError::Internal(format!("Corrupt create plan: {e}")))?;

    let mut projects_created = 0;

    for row in &plan {
        let manager_id = match &row.manager {
            Some(manager) => {
                let manager_key = normalize_key(manager);
                match Employee::find_id_by_name_key(pool, &manager_key).await? {
                    Some(id) => Some(id),
                    None => {
                        return Err(ImportError::CommitFailed(format!(
                            "manager '{manager}' no longer exists"
                        )))
                    }
                }
            }
            None => None,
        };

        let (_, created) = Project::upsert(
            pool,
            &CreateProject {
                name: row.name.clone(),
                name_key: row.name_key(),
                client: row.client.clone(),
                manager_id,
            },
        )
        .await?;
        projects_created += i32::from(created);
    }

    let counts = ImportOutcomeCounts {
        projects: Some(projects_created),
        ..ImportOutcomeCounts::default()
    };
    let outcome = ImportOutcome::Projects { projects_created };
    Ok((counts, outcome))
}
