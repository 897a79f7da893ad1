//! HTTP handlers for the import API.

pub mod import;
pub mod issues;
