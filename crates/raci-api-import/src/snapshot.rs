//! Reference snapshot.
//!
//! A read-only view of the reference entities known to the system at the
//! start of a validation run: canonical name keys of active departments,
//! active positions, all employees and all projects. The snapshot is built
//! once per run and never mutated by the engine; a run that needs fresher
//! state (e.g. after a prior batch committed) takes a new snapshot.
//!
//! Validate-then-commit is not transactionally isolated against a
//! concurrent import creating the same new name; commit tolerates that
//! race by creating entities idempotently per name key.

use std::collections::HashSet;

use crate::normalize::normalize_key;

/// Name-key sets of the reference entities existing before an import run.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSnapshot {
    /// Active department name keys.
    pub departments: HashSet<String>,
    /// Active position name keys.
    pub positions: HashSet<String>,
    /// All employee name keys.
    pub employees: HashSet<String>,
    /// All project name keys.
    pub projects: HashSet<String>,
}

impl ReferenceSnapshot {
    /// Build a snapshot from name iterators. Names are canonicalized here,
    /// so callers may pass display names or keys interchangeably.
    pub fn from_names<D, P, E, R>(departments: D, positions: P, employees: E, projects: R) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        Self {
            departments: collect_keys(departments),
            positions: collect_keys(positions),
            employees: collect_keys(employees),
            projects: collect_keys(projects),
        }
    }

    /// True if an active department with this name key exists.
    #[must_use]
    pub fn has_department(&self, key: &str) -> bool {
        self.departments.contains(key)
    }

    /// True if an active position with this name key exists.
    #[must_use]
    pub fn has_position(&self, key: &str) -> bool {
        self.positions.contains(key)
    }

    /// True if an employee with this name key exists.
    #[must_use]
    pub fn has_employee(&self, key: &str) -> bool {
        self.employees.contains(key)
    }

    /// True if a project with this name key exists.
    #[must_use]
    pub fn has_project(&self, key: &str) -> bool {
        self.projects.contains(key)
    }
}

fn collect_keys<I>(names: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| normalize_key(n.as_ref()))
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_names_canonicalizes() {
        let snapshot = ReferenceSnapshot::from_names(
            ["  IT ", "Sales"],
            ["Developer"],
            ["Alice  Smith"],
            Vec::<&str>::new(),
        );
        assert!(snapshot.has_department("it"));
        assert!(snapshot.has_department("sales"));
        assert!(snapshot.has_position("developer"));
        assert!(snapshot.has_employee("alice smith"));
        assert!(!snapshot.has_project("anything"));
    }

    #[test]
    fn test_blank_names_are_dropped() {
        let snapshot =
            ReferenceSnapshot::from_names(["", "  "], Vec::<&str>::new(), [""], Vec::<&str>::new());
        assert!(snapshot.departments.is_empty());
        assert!(snapshot.employees.is_empty());
    }
}
