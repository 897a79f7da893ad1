//! Strongly Typed Identifiers
//!
//! Type-safe identifier types for raci entities. Using the newtype pattern,
//! these types prevent accidental misuse of different ID types at compile time.
//!
//! # Example
//!
//! ```
//! use raci_core::{DepartmentId, PositionId};
//!
//! let department = DepartmentId::new();
//! let position = PositionId::new();
//!
//! fn requires_department(id: DepartmentId) -> String {
//!     id.to_string()
//! }
//!
//! let result = requires_department(department);
//! // requires_department(position); // This would not compile!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Error type for ID parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse
    pub id_type: &'static str,
    /// The underlying UUID parse error message
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to define a strongly-typed ID type
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random ID using UUID v4.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns a reference to the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        message: e.to_string(),
                    })
            }
        }
    };
}

define_id!(
    /// Strongly typed identifier for departments.
    ///
    /// # Example
    ///
    /// ```
    /// use raci_core::DepartmentId;
    /// use uuid::Uuid;
    ///
    /// let department_id = DepartmentId::new();
    /// println!("Department: {}", department_id);
    ///
    /// let uuid = Uuid::new_v4();
    /// let department_id = DepartmentId::from_uuid(uuid);
    /// assert_eq!(department_id.as_uuid(), &uuid);
    /// ```
    DepartmentId
);

define_id!(
    /// Strongly typed identifier for positions (job titles).
    PositionId
);

define_id!(
    /// Strongly typed identifier for employees.
    ///
    /// # Example
    ///
    /// ```
    /// use raci_core::EmployeeId;
    ///
    /// let employee_id = EmployeeId::new();
    /// println!("Employee: {}", employee_id);
    /// ```
    EmployeeId
);

define_id!(
    /// Strongly typed identifier for projects.
    ProjectId
);

define_id!(
    /// Strongly typed identifier for import jobs.
    ///
    /// Identifies one uploaded spreadsheet and its validation/commit lifecycle.
    ImportJobId
);
