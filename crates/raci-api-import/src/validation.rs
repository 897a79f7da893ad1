//! Per-row validation rules for employee and project imports.
//!
//! Rows are typed immediately after normalization ([`EmployeeRow`],
//! [`ProjectRow`]); positional `Vec<String>` arrays exist only at the
//! decoding boundary. Each validator evaluates its rules in a fixed order
//! and accumulates every message it finds — a row can carry several
//! warnings at once. Errors take precedence: a row with any required-field
//! (or, for projects, manager-resolution) error is classified `error` and
//! its warning checks do not run. A row is never both.
//!
//! The within-file duplicate detector (`seen_names`) is an explicit
//! accumulator owned by the caller and threaded through the row walk in
//! file order; every row's name key is added after evaluation, so later
//! duplicates are caught against all earlier rows.
//!
//! Note the deliberate asymmetry between the two import kinds: an employee
//! manager that cannot be resolved is a creation warning, while a project
//! manager that cannot be resolved is a fatal row error (a project's
//! manager is a required relationship). Both behaviors match the product's
//! observed rules and must not be unified.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_key, normalize_str};
use crate::snapshot::ReferenceSnapshot;

/// A normalized employee import row: name, department, position, manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRow {
    /// Employee display name (required).
    pub name: String,
    /// Department name (required; created on commit if unknown).
    pub department: String,
    /// Position name (required; created on commit if unknown).
    pub position: String,
    /// Manager name (optional; created as a placeholder on commit if unknown).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
}

impl EmployeeRow {
    /// Build a typed row from a raw positional row
    /// `[name, department, position, manager]`. Missing trailing cells read
    /// as empty.
    #[must_use]
    pub fn from_raw(raw: &[String]) -> Self {
        let cell = |i: usize| raw.get(i).map(|c| normalize_str(c)).unwrap_or_default();
        let manager = cell(3);
        Self {
            name: cell(0),
            department: cell(1),
            position: cell(2),
            manager: (!manager.is_empty()).then_some(manager),
        }
    }

    /// Canonical key of the employee name.
    #[must_use]
    pub fn name_key(&self) -> String {
        normalize_key(&self.name)
    }
}

/// A normalized project import row: name, client, manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRow {
    /// Project display name (required).
    pub name: String,
    /// Client name (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    /// Project manager name (optional, but must resolve to an existing
    /// employee when present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
}

impl ProjectRow {
    /// Build a typed row from a raw positional row `[name, client, manager]`.
    #[must_use]
    pub fn from_raw(raw: &[String]) -> Self {
        let cell = |i: usize| raw.get(i).map(|c| normalize_str(c)).unwrap_or_default();
        let client = cell(1);
        let manager = cell(2);
        Self {
            name: cell(0),
            client: (!client.is_empty()).then_some(client),
            manager: (!manager.is_empty()).then_some(manager),
        }
    }

    /// Canonical key of the project name.
    #[must_use]
    pub fn name_key(&self) -> String {
        normalize_key(&self.name)
    }
}

/// Distinguishes the two warning families.
///
/// `Creation` warnings only announce that a referenced name does not exist
/// yet and will be created; `Content` warnings flag likely user error
/// (duplicates, names that already exist, a manager cell holding a job
/// title). The batch classifier may pre-accept a batch whose warnings are
/// all `Creation`, never one containing a `Content` warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Pure creation intent: "this name will be created".
    Creation,
    /// Likely user error needing a human look.
    Content,
}

/// A single warning message with its family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    pub kind: WarningKind,
}

/// Accumulated validation messages for one row.
#[derive(Debug, Clone, Default)]
pub struct RowIssues {
    /// Error messages. Non-empty means the row is classified `error`.
    pub errors: Vec<String>,
    /// Warning messages. Only populated when no error fired.
    pub warnings: Vec<Warning>,
}

impl RowIssues {
    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warn(&mut self, kind: WarningKind, message: String) {
        self.warnings.push(Warning { message, kind });
    }

    /// True when the row carries no message at all (classified valid).
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// True when any warning is a content warning.
    #[must_use]
    pub fn has_content_warning(&self) -> bool {
        self.warnings.iter().any(|w| w.kind == WarningKind::Content)
    }
}

/// Validate one employee row at the given 1-based data row index.
///
/// Rules, in order:
/// 1. Required fields (name, department, position) — each empty field adds
///    its own error; any error classifies the row `error` and skips the
///    warning checks.
/// 2. Otherwise: unknown department/position → creation warning; a manager
///    cell matching an existing *position* name → content warning (the cell
///    must hold a person, not a job title); a manager matching neither a
///    position nor an employee → creation warning; a name already seen in
///    this file, or already existing in the system → content warnings.
///
/// The row's name key is added to `seen_names` unconditionally after
/// evaluation.
pub fn validate_employee_row(
    row_index: usize,
    row: &EmployeeRow,
    snapshot: &ReferenceSnapshot,
    seen_names: &mut HashSet<String>,
) -> RowIssues {
    let mut issues = RowIssues::default();

    if row.name.is_empty() {
        issues.error(format!("row {row_index}: name must not be empty"));
    }
    if row.department.is_empty() {
        issues.error(format!("row {row_index}: department must not be empty"));
    }
    if row.position.is_empty() {
        issues.error(format!("row {row_index}: position must not be empty"));
    }

    let name_key = row.name_key();

    if issues.errors.is_empty() {
        let department_key = normalize_key(&row.department);
        if !snapshot.has_department(&department_key) {
            issues.warn(
                WarningKind::Creation,
                format!("department '{}' will be created", row.department),
            );
        }

        let position_key = normalize_key(&row.position);
        if !snapshot.has_position(&position_key) {
            issues.warn(
                WarningKind::Creation,
                format!("position '{}' will be created", row.position),
            );
        }

        if let Some(manager) = &row.manager {
            let manager_key = normalize_key(manager);
            if snapshot.has_position(&manager_key) {
                issues.warn(
                    WarningKind::Content,
                    format!(
                        "manager '{manager}' matches a position name; expected a person, not a job title"
                    ),
                );
            } else if !snapshot.has_employee(&manager_key) {
                issues.warn(
                    WarningKind::Creation,
                    format!("manager '{manager}' will be created"),
                );
            }
        }

        if seen_names.contains(&name_key) {
            issues.warn(WarningKind::Content, "duplicate name in file".to_string());
        }
        if snapshot.has_employee(&name_key) {
            issues.warn(
                WarningKind::Content,
                "name already exists in system".to_string(),
            );
        }
    }

    seen_names.insert(name_key);
    issues
}

/// Validate one project row at the given 1-based data row index.
///
/// An empty name is an error; a manager that does not resolve to an
/// existing employee is an error too (unlike the employee import, where an
/// unknown manager is merely created — see the module docs). Warning-level:
/// a duplicate name within the file, otherwise either "already exists" or
/// the unconditional creation-intent warning — a project import has no
/// silent-success path, so every importable row carries at least one
/// warning for the caller to acknowledge.
pub fn validate_project_row(
    row_index: usize,
    row: &ProjectRow,
    snapshot: &ReferenceSnapshot,
    seen_names: &mut HashSet<String>,
) -> RowIssues {
    let mut issues = RowIssues::default();

    if row.name.is_empty() {
        issues.error(format!("row {row_index}: name must not be empty"));
    }

    if let Some(manager) = &row.manager {
        let manager_key = normalize_key(manager);
        if !snapshot.has_employee(&manager_key) {
            issues.error(format!(
                "row {row_index}: manager '{manager}' does not match any existing employee"
            ));
        }
    }

    let name_key = row.name_key();

    if issues.errors.is_empty() {
        if seen_names.contains(&name_key) {
            issues.warn(WarningKind::Content, "duplicate name in file".to_string());
        } else if snapshot.has_project(&name_key) {
            issues.warn(
                WarningKind::Content,
                "name already exists in system".to_string(),
            );
        } else {
            issues.warn(
                WarningKind::Creation,
                format!("project '{}' will be created", row.name),
            );
        }
    }

    seen_names.insert(name_key);
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ReferenceSnapshot {
        ReferenceSnapshot::from_names(
            ["IT", "Finance"],
            ["Developer", "Sales Manager"],
            ["Alice Smith", "Bob Jones"],
            ["Website Relaunch"],
        )
    }

    fn employee(name: &str, department: &str, position: &str, manager: &str) -> EmployeeRow {
        EmployeeRow::from_raw(&[
            name.to_string(),
            department.to_string(),
            position.to_string(),
            manager.to_string(),
        ])
    }

    fn project(name: &str, client: &str, manager: &str) -> ProjectRow {
        ProjectRow::from_raw(&[name.to_string(), client.to_string(), manager.to_string()])
    }

    #[test]
    fn test_employee_from_raw_normalizes_and_types() {
        let row = EmployeeRow::from_raw(&[
            "  Carol   White ".to_string(),
            "IT".to_string(),
            "Developer".to_string(),
            "   ".to_string(),
        ]);
        assert_eq!(row.name, "Carol White");
        assert_eq!(row.manager, None);

        // Missing trailing cells read as empty
        let short = EmployeeRow::from_raw(&["Carol".to_string()]);
        assert_eq!(short.department, "");
        assert_eq!(short.position, "");
    }

    #[test]
    fn test_employee_clean_row() {
        let mut seen = HashSet::new();
        let issues = validate_employee_row(
            1,
            &employee("Carol White", "IT", "Developer", "Alice Smith"),
            &snapshot(),
            &mut seen,
        );
        assert!(issues.is_clean());
        assert!(seen.contains("carol white"));
    }

    #[test]
    fn test_employee_required_fields_accumulate() {
        let mut seen = HashSet::new();
        let issues = validate_employee_row(3, &employee("", "", "", ""), &snapshot(), &mut seen);
        assert_eq!(
            issues.errors,
            vec![
                "row 3: name must not be empty",
                "row 3: department must not be empty",
                "row 3: position must not be empty",
            ]
        );
        // Errors block warnings entirely
        assert!(issues.warnings.is_empty());
    }

    #[test]
    fn test_employee_name_empty_only() {
        let mut seen = HashSet::new();
        let issues =
            validate_employee_row(1, &employee("", "IT", "Developer", ""), &snapshot(), &mut seen);
        assert_eq!(issues.errors, vec!["row 1: name must not be empty"]);
    }

    #[test]
    fn test_employee_creation_warnings() {
        let mut seen = HashSet::new();
        let issues = validate_employee_row(
            1,
            &employee("Carol", "Marketing", "Designer", "Unknown Person"),
            &snapshot(),
            &mut seen,
        );
        assert!(issues.errors.is_empty());
        let messages: Vec<_> = issues.warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "department 'Marketing' will be created",
                "position 'Designer' will be created",
                "manager 'Unknown Person' will be created",
            ]
        );
        assert!(issues
            .warnings
            .iter()
            .all(|w| w.kind == WarningKind::Creation));
    }

    #[test]
    fn test_employee_manager_matching_position_is_content_warning() {
        let mut seen = HashSet::new();
        let issues = validate_employee_row(
            1,
            &employee("Bob Jones", "IT", "Developer", "Sales Manager"),
            &snapshot(),
            &mut seen,
        );
        assert_eq!(issues.warnings.len(), 2); // position match + name exists
        let manager_warning = &issues.warnings[0];
        assert!(manager_warning.message.contains("matches a position name"));
        assert_eq!(manager_warning.kind, WarningKind::Content);
        // Crucially NOT a "will be created" warning
        assert!(!manager_warning.message.contains("will be created"));
    }

    #[test]
    fn test_employee_manager_matching_employee_is_silent() {
        let mut seen = HashSet::new();
        let issues = validate_employee_row(
            1,
            &employee("Carol", "IT", "Developer", "bob jones"),
            &snapshot(),
            &mut seen,
        );
        assert!(issues.is_clean());
    }

    #[test]
    fn test_employee_duplicate_in_file_is_case_insensitive() {
        let mut seen = HashSet::new();
        let first = validate_employee_row(
            1,
            &employee("Alice", "IT", "Developer", ""),
            &snapshot(),
            &mut seen,
        );
        assert!(first.is_clean());

        let second = validate_employee_row(
            2,
            &employee("alice", "IT", "Developer", ""),
            &snapshot(),
            &mut seen,
        );
        let messages: Vec<_> = second.warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, vec!["duplicate name in file"]);
        assert_eq!(second.warnings[0].kind, WarningKind::Content);
    }

    #[test]
    fn test_employee_duplicates_caught_against_all_earlier_rows() {
        let mut seen = HashSet::new();
        for i in 1..=3 {
            validate_employee_row(
                i,
                &employee("Dave", "IT", "Developer", ""),
                &snapshot(),
                &mut seen,
            );
        }
        let fourth = validate_employee_row(
            4,
            &employee("DAVE", "IT", "Developer", ""),
            &snapshot(),
            &mut seen,
        );
        assert_eq!(fourth.warnings.len(), 1);
    }

    #[test]
    fn test_employee_error_row_name_still_feeds_seen_names() {
        let mut seen = HashSet::new();
        // Error row (empty department), but its name still enters seen_names
        let first =
            validate_employee_row(1, &employee("Eve", "", "Developer", ""), &snapshot(), &mut seen);
        assert!(!first.errors.is_empty());

        let second = validate_employee_row(
            2,
            &employee("Eve", "IT", "Developer", ""),
            &snapshot(),
            &mut seen,
        );
        let messages: Vec<_> = second.warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, vec!["duplicate name in file"]);
    }

    #[test]
    fn test_employee_existing_name_warning() {
        let mut seen = HashSet::new();
        let issues = validate_employee_row(
            1,
            &employee("ALICE SMITH", "IT", "Developer", ""),
            &snapshot(),
            &mut seen,
        );
        let messages: Vec<_> = issues.warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, vec!["name already exists in system"]);
    }

    #[test]
    fn test_employee_multiple_warnings_are_all_retained() {
        let mut seen = HashSet::new();
        seen.insert("frank".to_string());
        let issues = validate_employee_row(
            5,
            &employee("Frank", "Marketing", "Developer", ""),
            &snapshot(),
            &mut seen,
        );
        let messages: Vec<_> = issues.warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "department 'Marketing' will be created",
                "duplicate name in file",
            ]
        );
    }

    #[test]
    fn test_project_clean_row_still_warns_creation() {
        // Project import has no silent-success path
        let mut seen = HashSet::new();
        let issues = validate_project_row(
            1,
            &project("New Portal", "Acme", "Alice Smith"),
            &snapshot(),
            &mut seen,
        );
        assert!(issues.errors.is_empty());
        let messages: Vec<_> = issues.warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, vec!["project 'New Portal' will be created"]);
        assert_eq!(issues.warnings[0].kind, WarningKind::Creation);
    }

    #[test]
    fn test_project_unknown_manager_is_an_error_not_a_warning() {
        // Deliberate asymmetry with the employee import
        let mut seen = HashSet::new();
        let issues = validate_project_row(
            2,
            &project("ProjX", "ClientY", "NoSuchPerson"),
            &snapshot(),
            &mut seen,
        );
        assert_eq!(
            issues.errors,
            vec!["row 2: manager 'NoSuchPerson' does not match any existing employee"]
        );
        assert!(issues.warnings.is_empty());
    }

    #[test]
    fn test_project_name_empty_and_bad_manager_both_error() {
        let mut seen = HashSet::new();
        let issues =
            validate_project_row(1, &project("", "Acme", "Nobody"), &snapshot(), &mut seen);
        assert_eq!(issues.errors.len(), 2);
    }

    #[test]
    fn test_project_existing_name_warns_already_exists() {
        let mut seen = HashSet::new();
        let issues = validate_project_row(
            1,
            &project("website relaunch", "", ""),
            &snapshot(),
            &mut seen,
        );
        let messages: Vec<_> = issues.warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, vec!["name already exists in system"]);
        assert_eq!(issues.warnings[0].kind, WarningKind::Content);
    }

    #[test]
    fn test_project_duplicate_in_file() {
        let mut seen = HashSet::new();
        validate_project_row(1, &project("Portal", "", ""), &snapshot(), &mut seen);
        let second = validate_project_row(2, &project("PORTAL", "", ""), &snapshot(), &mut seen);
        let messages: Vec<_> = second.warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, vec!["duplicate name in file"]);
    }
}
