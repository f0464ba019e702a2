//! Bulk CSV upload of students and employees
//!
//! The whole file is validated first; records are written in one transaction
//! only when not a single row has a problem.

pub mod employees;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod header;
pub mod importer;
pub mod schema;
pub mod students;
pub mod uniqueness;
pub mod upload;
pub mod validators;

pub use error::ImportError;
pub use executor::BulkImportExecutor;
