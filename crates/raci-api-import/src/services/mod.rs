//! Import services.
//!
//! - [`csv_parser`] — decoding boundary: CSV bytes → raw rows
//! - [`reconcile`] — batch classification and creation-count projection
//! - [`export`] — error-row CSV rendering
//! - [`import_service`] — upload validation + job persistence
//! - [`commit_service`] — create-plan application

pub mod commit_service;
pub mod csv_parser;
pub mod export;
pub mod import_service;
pub mod reconcile;
