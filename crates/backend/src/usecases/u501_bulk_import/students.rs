use contracts::domain::a001_student::aggregate::StudentDto;
use contracts::usecases::u501_bulk_import::{ImportEntity, ValidationError};

use super::schema::{email, optional_text, required_text, ImportRow, ImportSchema, UniqueField};

/// `Username, Email, Firstname, Lastname`; Firstname may be empty
pub struct StudentSchema;

impl ImportSchema for StudentSchema {
    type Record = StudentDto;

    const ENTITY: ImportEntity = ImportEntity::Students;
    const HEADER: &'static [&'static str] = &["Username", "Email", "Firstname", "Lastname"];
    const UNIQUE: &'static [(usize, UniqueField)] =
        &[(0, UniqueField::StudentUsername), (1, UniqueField::StudentEmail)];

    fn parse(row: &ImportRow, errors: &mut Vec<ValidationError>) -> Option<StudentDto> {
        let username = required_text(row, 0, "Username", errors);
        let email = email(row, 1, errors);
        let firstname = optional_text(row, 2);
        let lastname = required_text(row, 3, "Lastname", errors);

        Some(StudentDto {
            username: username?,
            email: email?,
            firstname,
            lastname: lastname?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::usecases::u501_bulk_import::ImportErrorKind;

    fn row(cells: &[&str]) -> ImportRow {
        ImportRow::new(2, cells.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_parse_valid_row() {
        let mut errors = Vec::new();
        let record = StudentSchema::parse(&row(&["alice", "alice@x.com", "", "A"]), &mut errors).unwrap();
        assert!(errors.is_empty());
        assert_eq!(record.username, "alice");
        assert_eq!(record.firstname, None);
    }

    #[test]
    fn test_every_field_problem_reported() {
        let mut errors = Vec::new();
        let record = StudentSchema::parse(&row(&["", "not-an-email", "Al", ""]), &mut errors);
        assert!(record.is_none());
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.kind == ImportErrorKind::RowFieldInvalid && e.row == 2));
    }
}
