pub mod response;

pub use response::{ImportEntity, ImportErrorKind, ImportReport, ImportStatus, ValidationError};
