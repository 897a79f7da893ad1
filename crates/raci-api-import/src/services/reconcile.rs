//! Batch classification and creation-count projection.
//!
//! [`validate_employee_rows`] / [`validate_project_rows`] walk a decoded
//! row set in file order, apply the per-row validators and bucket every
//! row into exactly one of valid / warning / error. The resulting
//! [`ValidationOutcome`] carries the full message lists, the summary
//! counts shown in the preview, and the `can_import` gate: any error row
//! blocks the whole batch — there is no partial-import mode.
//!
//! Creation counts are projected against a working copy of the snapshot's
//! name sets, extended as rows are walked, so a new name repeated across
//! several rows is counted once — matching the commit-time
//! create-by-name-once semantics. Membership checks are hash-set lookups;
//! the projection is O(rows).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize_key;
use crate::snapshot::ReferenceSnapshot;
use crate::validation::{
    validate_employee_row, validate_project_row, EmployeeRow, ProjectRow, RowIssues,
};

/// Classification of a row that carries messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Stable string form used in persistence and API payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// One classified row with its retained messages.
///
/// Valid rows are not wrapped — they are collected separately in
/// [`ValidationOutcome::valid_rows`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRow<T> {
    /// 1-based index over data rows.
    pub row_index: usize,
    /// The normalized row.
    pub data: T,
    /// Every message produced for the row. The UI may truncate for
    /// display; the list itself is never shortened.
    pub messages: Vec<String>,
    /// Whether the row blocks the import or merely needs acknowledgment.
    pub severity: Severity,
}

/// Preview counts for a validated batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImportSummary {
    /// Rows with no messages.
    pub valid_count: usize,
    /// Rows with warnings only.
    pub warning_count: usize,
    /// Rows with errors.
    pub error_count: usize,
    /// Distinct new department names the accepted rows would create.
    pub new_departments: usize,
    /// Distinct new position names the accepted rows would create.
    pub new_positions: usize,
    /// Distinct new manager names the accepted rows would create.
    pub new_managers: usize,
    /// Distinct new project names the accepted rows would create.
    pub new_projects: usize,
}

/// Result of validating one uploaded row set.
#[derive(Debug, Clone)]
pub struct ValidationOutcome<T> {
    /// Rows with no messages, in file order.
    pub valid_rows: Vec<T>,
    /// Rows needing acknowledgment, in file order.
    pub warning_rows: Vec<IssueRow<T>>,
    /// Rows blocking the import, in file order.
    pub error_rows: Vec<IssueRow<T>>,
    /// Counts for the preview.
    pub summary: ImportSummary,
    /// True when every warning in the batch is a pure creation-intent
    /// warning; the caller may then skip the explicit confirmation step.
    /// Any content warning (duplicate, already-exists, manager-is-a-title)
    /// anywhere in the batch forces explicit acceptance.
    pub warnings_auto_accepted: bool,
}

impl<T: Clone> ValidationOutcome<T> {
    /// Whether the batch may be committed.
    ///
    /// Requires zero error rows, at least one accepted row, and — when
    /// warnings exist — acceptance (explicit or via the auto-accept
    /// heuristic).
    #[must_use]
    pub fn can_import(&self, warnings_accepted: bool) -> bool {
        self.error_rows.is_empty()
            && (!self.valid_rows.is_empty() || !self.warning_rows.is_empty())
            && (self.warning_rows.is_empty() || warnings_accepted || self.warnings_auto_accepted)
    }

    /// The accepted row set sent to commit: valid rows followed by the
    /// warning rows' data.
    #[must_use]
    pub fn create_plan(&self) -> Vec<T> {
        let mut plan = self.valid_rows.clone();
        plan.extend(self.warning_rows.iter().map(|w| w.data.clone()));
        plan
    }
}

/// Validate a decoded employee row set against the reference snapshot.
pub fn validate_employee_rows(
    raw_rows: &[Vec<String>],
    snapshot: &ReferenceSnapshot,
) -> ValidationOutcome<EmployeeRow> {
    let rows: Vec<EmployeeRow> = raw_rows.iter().map(|r| EmployeeRow::from_raw(r)).collect();

    let mut seen_names = HashSet::new();
    let mut outcome = classify(&rows, |row_index, row| {
        validate_employee_row(row_index, row, snapshot, &mut seen_names)
    });

    let accepted = outcome.create_plan();
    let counts = project_employee_creations(&accepted, snapshot);
    outcome.summary.new_departments = counts.departments;
    outcome.summary.new_positions = counts.positions;
    outcome.summary.new_managers = counts.managers;
    outcome
}

/// Validate a decoded project row set against the reference snapshot.
pub fn validate_project_rows(
    raw_rows: &[Vec<String>],
    snapshot: &ReferenceSnapshot,
) -> ValidationOutcome<ProjectRow> {
    let rows: Vec<ProjectRow> = raw_rows.iter().map(|r| ProjectRow::from_raw(r)).collect();

    let mut seen_names = HashSet::new();
    let mut outcome = classify(&rows, |row_index, row| {
        validate_project_row(row_index, row, snapshot, &mut seen_names)
    });

    outcome.summary.new_projects = project_project_creations(&outcome.create_plan(), snapshot);
    outcome
}

/// Shared bucketing walk: applies the validator per row and classifies.
fn classify<T: Clone>(
    rows: &[T],
    mut validate: impl FnMut(usize, &T) -> RowIssues,
) -> ValidationOutcome<T> {
    let mut valid_rows = Vec::new();
    let mut warning_rows: Vec<IssueRow<T>> = Vec::new();
    let mut error_rows: Vec<IssueRow<T>> = Vec::new();
    let mut content_warning_seen = false;

    for (i, row) in rows.iter().enumerate() {
        let row_index = i + 1;
        let issues = validate(row_index, row);

        if !issues.errors.is_empty() {
            error_rows.push(IssueRow {
                row_index,
                data: row.clone(),
                messages: issues.errors,
                severity: Severity::Error,
            });
        } else if !issues.warnings.is_empty() {
            content_warning_seen |= issues.has_content_warning();
            warning_rows.push(IssueRow {
                row_index,
                data: row.clone(),
                messages: issues.warnings.into_iter().map(|w| w.message).collect(),
                severity: Severity::Warning,
            });
        } else {
            valid_rows.push(row.clone());
        }
    }

    let summary = ImportSummary {
        valid_count: valid_rows.len(),
        warning_count: warning_rows.len(),
        error_count: error_rows.len(),
        ..ImportSummary::default()
    };

    ValidationOutcome {
        valid_rows,
        warning_rows,
        error_rows,
        summary,
        warnings_auto_accepted: !content_warning_seen,
    }
}

/// Distinct new names an accepted employee row set would create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeCreationCounts {
    pub departments: usize,
    pub positions: usize,
    pub managers: usize,
}

/// Project how many distinct new departments, positions and managers the
/// accepted rows would create, without mutating the snapshot.
///
/// Working copies of the snapshot's name sets are extended as rows are
/// walked, so a name introduced by several rows counts once. Each row's
/// own name joins the employee working set before its manager cell is
/// checked, mirroring the commit order (a manager referenced after the
/// row that imports that person is not a new creation).
#[must_use]
pub fn project_employee_creations(
    accepted: &[EmployeeRow],
    snapshot: &ReferenceSnapshot,
) -> EmployeeCreationCounts {
    let mut departments = snapshot.departments.clone();
    let mut positions = snapshot.positions.clone();
    let mut employees = snapshot.employees.clone();
    let mut counts = EmployeeCreationCounts::default();

    for row in accepted {
        employees.insert(row.name_key());

        let department_key = normalize_key(&row.department);
        if !department_key.is_empty() && departments.insert(department_key) {
            counts.departments += 1;
        }

        let position_key = normalize_key(&row.position);
        if !position_key.is_empty() && positions.insert(position_key) {
            counts.positions += 1;
        }

        if let Some(manager) = &row.manager {
            let manager_key = normalize_key(manager);
            if employees.insert(manager_key) {
                counts.managers += 1;
            }
        }
    }

    counts
}

/// Project how many distinct new project names the accepted rows would
/// create, without mutating the snapshot.
#[must_use]
pub fn project_project_creations(accepted: &[ProjectRow], snapshot: &ReferenceSnapshot) -> usize {
    let mut projects = snapshot.projects.clone();
    let mut count = 0;

    for row in accepted {
        let name_key = row.name_key();
        if !name_key.is_empty() && projects.insert(name_key) {
            count += 1;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ReferenceSnapshot {
        ReferenceSnapshot::from_names(
            ["IT"],
            ["Developer", "Sales Manager"],
            ["Alice Smith"],
            ["Website Relaunch"],
        )
    }

    fn raw(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn test_exactly_one_classification_per_row() {
        let rows = vec![
            raw(&["Bob", "IT", "Developer", ""]),         // valid
            raw(&["Carol", "Marketing", "Developer", ""]), // warning
            raw(&["", "IT", "Developer", ""]),            // error
        ];
        let outcome = validate_employee_rows(&rows, &snapshot());
        assert_eq!(outcome.valid_rows.len(), 1);
        assert_eq!(outcome.warning_rows.len(), 1);
        assert_eq!(outcome.error_rows.len(), 1);
        assert_eq!(outcome.summary.valid_count, 1);
        assert_eq!(outcome.summary.warning_count, 1);
        assert_eq!(outcome.summary.error_count, 1);
    }

    #[test]
    fn test_error_row_never_counted_as_warning() {
        // Empty department AND an unknown position: the row is an error and
        // must not leak its would-be warnings anywhere.
        let rows = vec![raw(&["Bob", "", "Designer", ""])];
        let outcome = validate_employee_rows(&rows, &snapshot());
        assert_eq!(outcome.error_rows.len(), 1);
        assert!(outcome.warning_rows.is_empty());
        assert_eq!(outcome.summary.new_positions, 0);
    }

    #[test]
    fn test_repeated_new_department_counts_once() {
        let rows = vec![
            raw(&["A", "Sales", "Developer", ""]),
            raw(&["B", "sales", "Developer", ""]),
            raw(&["C", "  Sales ", "Developer", ""]),
        ];
        let outcome = validate_employee_rows(&rows, &snapshot());
        assert_eq!(outcome.summary.new_departments, 1);
    }

    #[test]
    fn test_creation_count_is_order_independent() {
        let forward = vec![
            raw(&["A", "Sales", "QA", ""]),
            raw(&["B", "Legal", "QA", ""]),
            raw(&["C", "Sales", "Ops", ""]),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = validate_employee_rows(&forward, &snapshot()).summary;
        let b = validate_employee_rows(&reversed, &snapshot()).summary;
        assert_eq!(a.new_departments, b.new_departments);
        assert_eq!(a.new_positions, b.new_positions);
    }

    #[test]
    fn test_manager_counting_extends_working_set() {
        let rows = vec![
            // Two rows referencing the same unknown manager: one creation
            raw(&["A", "IT", "Developer", "Grace Green"]),
            raw(&["B", "IT", "Developer", "grace green"]),
            // Manager imported earlier in the same file: not a creation
            raw(&["Henry Hill", "IT", "Developer", ""]),
            raw(&["C", "IT", "Developer", "Henry Hill"]),
            // Existing employee as manager: not a creation
            raw(&["D", "IT", "Developer", "Alice Smith"]),
        ];
        let outcome = validate_employee_rows(&rows, &snapshot());
        assert_eq!(outcome.summary.new_managers, 1);
    }

    #[test]
    fn test_error_rows_do_not_feed_creation_counts() {
        let rows = vec![
            raw(&["", "Marketing", "Designer", ""]), // error row
            raw(&["A", "IT", "Developer", ""]),      // valid row
        ];
        let outcome = validate_employee_rows(&rows, &snapshot());
        assert_eq!(outcome.summary.new_departments, 0);
        assert_eq!(outcome.summary.new_positions, 0);
    }

    #[test]
    fn test_auto_accept_with_pure_creation_warnings() {
        let rows = vec![
            raw(&["A", "Marketing", "Developer", ""]),
            raw(&["B", "IT", "Designer", ""]),
        ];
        let outcome = validate_employee_rows(&rows, &snapshot());
        assert_eq!(outcome.warning_rows.len(), 2);
        assert!(outcome.warnings_auto_accepted);
        // Auto-accepted warnings do not require explicit acceptance
        assert!(outcome.can_import(false));
    }

    #[test]
    fn test_content_warning_blocks_auto_accept() {
        let rows = vec![
            raw(&["A", "Marketing", "Developer", ""]), // creation warning
            raw(&["Alice Smith", "IT", "Developer", ""]), // exists: content warning
        ];
        let outcome = validate_employee_rows(&rows, &snapshot());
        assert!(!outcome.warnings_auto_accepted);
        assert!(!outcome.can_import(false));
        assert!(outcome.can_import(true));
    }

    #[test]
    fn test_can_import_blocked_by_any_error() {
        let rows = vec![
            raw(&["A", "IT", "Developer", ""]),
            raw(&["", "IT", "Developer", ""]),
        ];
        let outcome = validate_employee_rows(&rows, &snapshot());
        // No partial import: one bad row blocks the batch even with acceptance
        assert!(!outcome.can_import(true));
    }

    #[test]
    fn test_can_import_requires_at_least_one_accepted_row() {
        let outcome = validate_employee_rows(&[], &snapshot());
        assert!(!outcome.can_import(true));
    }

    #[test]
    fn test_create_plan_is_valid_then_warning_data() {
        let rows = vec![
            raw(&["A", "Marketing", "Developer", ""]), // warning
            raw(&["B", "IT", "Developer", ""]),        // valid
            raw(&["C", "IT", "Developer", ""]),        // valid
        ];
        let outcome = validate_employee_rows(&rows, &snapshot());
        let plan = outcome.create_plan();
        assert_eq!(plan.len(), 3);
        // Valid rows first, then warning rows' data
        assert_eq!(plan[0].name, "B");
        assert_eq!(plan[1].name, "C");
        assert_eq!(plan[2].name, "A");
    }

    #[test]
    fn test_project_batch_counts_and_auto_accept() {
        let rows = vec![
            raw(&["Portal", "Acme", ""]),
            raw(&["portal", "Acme", ""]), // duplicate: content warning
            raw(&["CRM Rollout", "", ""]),
        ];
        let outcome = validate_project_rows(&rows, &snapshot());
        assert_eq!(outcome.summary.warning_count, 3);
        assert_eq!(outcome.summary.new_projects, 2); // portal counted once
        assert!(!outcome.warnings_auto_accepted); // duplicate is content-level
    }

    #[test]
    fn test_project_error_blocks_batch() {
        let rows = vec![
            raw(&["Portal", "Acme", "Nobody Known"]),
            raw(&["CRM Rollout", "", ""]),
        ];
        let outcome = validate_project_rows(&rows, &snapshot());
        assert_eq!(outcome.error_rows.len(), 1);
        assert!(!outcome.can_import(true));
    }

    #[test]
    fn test_project_pure_creation_batch_auto_accepts() {
        let rows = vec![raw(&["Portal", "Acme", "Alice Smith"]), raw(&["CRM", "", ""])];
        let outcome = validate_project_rows(&rows, &snapshot());
        assert!(outcome.warnings_auto_accepted);
        assert!(outcome.can_import(false));
        assert_eq!(outcome.summary.new_projects, 2);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "\"error\"");
        assert_eq!(Severity::Warning.as_str(), "warning");
    }
}
