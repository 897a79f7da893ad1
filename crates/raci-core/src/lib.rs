//! raci Core Library
//!
//! Shared types for the raci responsibility-matrix platform.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (DepartmentId, PositionId, EmployeeId, ProjectId, ImportJobId)
//! - [`error`] - Standardized error types (RaciError)
//!
//! # Example
//!
//! ```
//! use raci_core::{DepartmentId, EmployeeId, RaciError, Result};
//!
//! let department_id = DepartmentId::new();
//! let employee_id = EmployeeId::new();
//!
//! fn example() -> Result<()> {
//!     Err(RaciError::NotFound {
//!         resource: "Employee".to_string(),
//!         id: None,
//!     })
//! }
//! ```

pub mod error;
pub mod ids;

// Re-export main types for convenient access
pub use error::{RaciError, Result};
pub use ids::{DepartmentId, EmployeeId, ImportJobId, PositionId, ProjectId};
