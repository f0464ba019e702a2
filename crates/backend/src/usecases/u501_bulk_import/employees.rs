use contracts::domain::a002_employee::aggregate::EmployeeDto;
use contracts::shared::validation::{EXPERIENCE_PLACES, EXPERIENCE_RANGE};
use contracts::usecases::u501_bulk_import::{ImportEntity, ValidationError};

use super::schema::{
    date, decimal_in_range, email, optional_count, optional_text, required_text, ImportRow,
    ImportSchema, UniqueField,
};

/// Ten columns, see `HEADER`
///
/// Empty `Past Roles` / `Achievement Badge` become `None`, empty `Skill Points` is 0.
pub struct EmployeeSchema;

impl ImportSchema for EmployeeSchema {
    type Record = EmployeeDto;

    const ENTITY: ImportEntity = ImportEntity::Employees;
    const HEADER: &'static [&'static str] = &[
        "Name",
        "Email",
        "Date of Joining",
        "Current Role",
        "Past Roles",
        "Skills",
        "Experience",
        "Educational Background",
        "Skill Points",
        "Achievement Badge",
    ];
    const UNIQUE: &'static [(usize, UniqueField)] = &[(1, UniqueField::EmployeeEmail)];

    fn parse(row: &ImportRow, errors: &mut Vec<ValidationError>) -> Option<EmployeeDto> {
        let name = required_text(row, 0, "Name", errors);
        let email = email(row, 1, errors);
        let date_of_joining = date(row, 2, "Date of Joining", errors);
        let current_role = required_text(row, 3, "Current Role", errors);
        let experience = decimal_in_range(row, 6, "Experience", &EXPERIENCE_RANGE, EXPERIENCE_PLACES, errors);
        let skill_points = optional_count(row, 8, "Skill Points", 0, errors);

        Some(EmployeeDto {
            name: name?,
            email: email?,
            date_of_joining: date_of_joining?,
            current_role: current_role?,
            past_roles: optional_text(row, 4),
            skills: row.cell(5).to_string(),
            experience: experience?,
            educational_background: row.cell(7).to_string(),
            skill_points: skill_points?,
            achievement_badge: optional_text(row, 9),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::usecases::u501_bulk_import::ImportErrorKind;

    fn row(cells: &[&str]) -> ImportRow {
        ImportRow::new(4, cells.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_parse_valid_row() {
        let mut errors = Vec::new();
        let record = EmployeeSchema::parse(
            &row(&[
                "Dana", "dana@x.com", "2021-03-01", "Analyst", "", "SQL", "4.5", "BSc", "", "",
            ]),
            &mut errors,
        )
        .unwrap();
        assert!(errors.is_empty());
        assert_eq!(record.date_of_joining, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert_eq!(record.experience, 4.5);
        assert_eq!(record.skill_points, 0);
        assert_eq!(record.past_roles, None);
        assert_eq!(record.achievement_badge, None);
    }

    #[test]
    fn test_non_numeric_experience_is_type_error() {
        let mut errors = Vec::new();
        let record = EmployeeSchema::parse(
            &row(&[
                "Dana", "dana@x.com", "2021-03-01", "Analyst", "", "SQL", "abc", "BSc", "5", "Gold",
            ]),
            &mut errors,
        );
        assert!(record.is_none());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ImportErrorKind::RowType);
        assert_eq!(errors[0].message, "Row 4: Experience 'abc' is not a number");
    }

    #[test]
    fn test_bad_date_and_email_both_reported() {
        let mut errors = Vec::new();
        let record = EmployeeSchema::parse(
            &row(&[
                "Dana", "dana-at-x", "03/01/2021", "Analyst", "", "", "1", "", "", "",
            ]),
            &mut errors,
        );
        assert!(record.is_none());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, ImportErrorKind::RowFieldInvalid);
        assert_eq!(errors[1].kind, ImportErrorKind::RowType);
    }
}
