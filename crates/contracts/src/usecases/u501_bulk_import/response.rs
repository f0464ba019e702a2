use serde::{Deserialize, Serialize};

/// Entity a bulk upload creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportEntity {
    Students,
    Employees,
}

impl ImportEntity {
    pub fn label(&self) -> &'static str {
        match self {
            ImportEntity::Students => "students",
            ImportEntity::Employees => "employees",
        }
    }
}

/// Kind of a problem found while scanning an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportErrorKind {
    /// Header row differs from the expected tuple; nothing else is scanned
    HeaderMismatch,
    /// Row has the wrong number of fields
    RowArity,
    /// Cell could not be converted (date, number)
    RowType,
    /// Value already stored, or repeated inside the same file
    RowUniquenessConflict,
    /// Cell converted fine but breaks a rule (email syntax, range, required)
    RowFieldInvalid,
    /// Error cap reached; remaining rows were not scanned
    TooManyErrors,
}

/// One problem, tied to the 1-based row it was found in (header is row 1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub row: usize,
    pub kind: ImportErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(row: usize, kind: ImportErrorKind, message: impl Into<String>) -> Self {
        Self {
            row,
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// Every row was valid and the whole batch was saved
    Committed,
    /// Validation errors; nothing was saved
    Rejected,
    /// The batch looked clean but could not be saved; nothing was saved
    Failed,
}

/// Result of one bulk upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub entity: ImportEntity,
    pub status: ImportStatus,
    /// Data rows read before the import finished or stopped
    pub rows_scanned: usize,
    /// Records saved (zero unless committed)
    pub committed: u64,
    /// In detection order
    pub errors: Vec<ValidationError>,
    pub message: String,
}

impl ImportReport {
    /// Error strings in the order they were found, for display
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_snake_case() {
        let report = ImportReport {
            entity: ImportEntity::Students,
            status: ImportStatus::Rejected,
            rows_scanned: 1,
            committed: 0,
            errors: vec![ValidationError::new(
                2,
                ImportErrorKind::RowArity,
                "Row 2 does not have precisely 4 fields",
            )],
            message: "Upload rejected".into(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["entity"], "students");
        assert_eq!(json["errors"][0]["kind"], "row_arity");
        assert_eq!(report.error_messages(), vec!["Row 2 does not have precisely 4 fields"]);
    }
}
