use sea_orm::DbErr;
use thiserror::Error;

/// Failure that stops an import before a report can be produced
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Uniqueness lookup failed: {0}")]
    Lookup(#[source] DbErr),

    #[error("Failed to save batch: {0}")]
    Persistence(#[source] DbErr),
}
