use async_trait::async_trait;
use contracts::usecases::u501_bulk_import::ValidationError;
use sea_orm::DbErr;
use std::collections::{HashMap, HashSet};

use super::error::ImportError;
use super::gateway::SeaOrmStore;
use super::schema::{uniqueness_error, ImportRow, UniqueField};
use crate::domain::{a001_student, a002_employee};

/// Looks up values already present in the store
#[async_trait]
pub trait UniquenessLookup: Send + Sync {
    async fn is_taken(&self, field: UniqueField, value: &str) -> Result<bool, DbErr>;
}

#[async_trait]
impl<'a> UniquenessLookup for SeaOrmStore<'a> {
    async fn is_taken(&self, field: UniqueField, value: &str) -> Result<bool, DbErr> {
        match field {
            UniqueField::StudentUsername => {
                a001_student::repository::username_exists(self.conn, value).await
            }
            UniqueField::StudentEmail => a001_student::repository::email_exists(self.conn, value).await,
            UniqueField::EmployeeEmail => {
                a002_employee::repository::email_exists(self.conn, value).await
            }
        }
    }
}

/// Unique values seen so far in the current file
#[derive(Debug, Default)]
pub struct StagedValues {
    seen: HashMap<UniqueField, HashSet<String>>,
}

impl StagedValues {
    /// Returns `false` when the value was already seen for this field
    pub fn record(&mut self, field: UniqueField, value: &str) -> bool {
        self.seen.entry(field).or_default().insert(value.to_string())
    }
}

/// Check every unique column of a row against the file so far and the store
///
/// Runs on the raw cell even when its format is invalid. Empty cells are skipped.
pub async fn check_row<S>(
    store: &S,
    unique: &[(usize, UniqueField)],
    row: &ImportRow,
    staged: &mut StagedValues,
    errors: &mut Vec<ValidationError>,
) -> Result<(), ImportError>
where
    S: UniquenessLookup + ?Sized,
{
    for &(index, field) in unique {
        let value = row.cell(index);
        if value.is_empty() {
            continue;
        }

        if !staged.record(field, value) {
            errors.push(uniqueness_error(row, field, value, true));
        } else if store
            .is_taken(field, value)
            .await
            .map_err(ImportError::Lookup)?
        {
            errors.push(uniqueness_error(row, field, value, false));
        }
    }
    Ok(())
}
