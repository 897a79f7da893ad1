//! Spreadsheet Import & Reconciliation.
//!
//! This crate owns the import pipeline for organizational reference data:
//! employees (name, department, position, manager) and projects (name,
//! client, manager). An upload is decoded into raw rows, normalized,
//! validated against a snapshot of the existing reference entities, and
//! classified per row as valid, warning or error. Once any warnings are
//! acknowledged, the accepted rows become a create plan that is applied
//! with idempotent create-by-name semantics.
//!
//! REST endpoints provided:
//! - CSV upload + validation preview per import kind
//! - Import job tracking with per-row issue reporting
//! - Error-row CSV download
//! - Commit of the accepted row set
//!
//! # Example
//!
//! ```rust,ignore
//! use raci_api_import::{import_router, ImportState};
//! use axum::Router;
//!
//! let state = ImportState::new(pool);
//! let app = Router::new().merge(import_router(state));
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod router;
pub mod services;
pub mod snapshot;
pub mod validation;

// Re-export public API
pub use error::ImportError;
pub use router::{import_router, ImportState};
pub use snapshot::ReferenceSnapshot;
