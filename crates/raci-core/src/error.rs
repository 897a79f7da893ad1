//! Error Types
//!
//! Standardized error types shared across raci services.
//!
//! # Example
//!
//! ```
//! use raci_core::{RaciError, Result};
//!
//! fn find_employee(id: &str) -> Result<String> {
//!     if id.is_empty() {
//!         return Err(RaciError::NotFound {
//!             resource: "Employee".to_string(),
//!             id: None,
//!         });
//!     }
//!     Ok(format!("Employee {}", id))
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// Standardized error type for raci services.
///
/// Each variant maps to a common error scenario and can be converted to an
/// HTTP status code at the API boundary.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RaciError {
    /// Requested resource was not found.
    ///
    /// Use when a database lookup returns no results.
    /// Maps to HTTP 404 Not Found.
    #[error("{resource} not found{}", id.as_ref().map(|i| format!(": {i}")).unwrap_or_default())]
    NotFound {
        /// The type of resource that was not found (e.g., "Employee", "ImportJob")
        resource: String,
        /// Optional identifier of the resource
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Input validation failure.
    ///
    /// Use when user input fails validation rules.
    /// Maps to HTTP 400 Bad Request.
    #[error("Validation error on field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },
}

/// Type alias for Results using `RaciError`.
pub type Result<T> = std::result::Result<T, RaciError>;
