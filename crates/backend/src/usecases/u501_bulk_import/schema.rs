use chrono::NaiveDate;
use contracts::shared::validation::{in_range, is_valid_email};
use contracts::usecases::u501_bulk_import::{ImportEntity, ImportErrorKind, ValidationError};
use std::ops::RangeInclusive;

use super::validators::{parse_date, parse_decimal, parse_integer};

/// One data line of the upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// 1-based, the header is row 1
    pub number: usize,
    pub cells: Vec<String>,
}

impl ImportRow {
    pub fn new(number: usize, cells: Vec<String>) -> Self {
        Self { number, cells }
    }

    /// Trimmed cell, empty when the index is out of range
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(|s| s.trim()).unwrap_or("")
    }

    fn error(&self, kind: ImportErrorKind, message: impl AsRef<str>) -> ValidationError {
        ValidationError::new(
            self.number,
            kind,
            format!("Row {}: {}", self.number, message.as_ref()),
        )
    }
}

/// Columns that must be unique in the store and inside one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    StudentUsername,
    StudentEmail,
    EmployeeEmail,
}

impl UniqueField {
    pub fn label(&self) -> &'static str {
        match self {
            UniqueField::StudentUsername => "Username",
            UniqueField::StudentEmail | UniqueField::EmployeeEmail => "Email",
        }
    }
}

/// Column layout and conversion rules of one uploadable entity
pub trait ImportSchema {
    type Record: Send + Sync;

    const ENTITY: ImportEntity;
    const HEADER: &'static [&'static str];
    /// (column index, field) pairs checked for uniqueness
    const UNIQUE: &'static [(usize, UniqueField)];

    /// Convert a row of correct arity; every problem is pushed to `errors`
    fn parse(row: &ImportRow, errors: &mut Vec<ValidationError>) -> Option<Self::Record>;
}

// Cell helpers shared by the schemas. Each pushes at most one error.

pub(crate) fn required_text(
    row: &ImportRow,
    index: usize,
    label: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    let value = row.cell(index);
    if value.is_empty() {
        errors.push(row.error(ImportErrorKind::RowFieldInvalid, format!("{} is required", label)));
        return None;
    }
    Some(value.to_string())
}

pub(crate) fn optional_text(row: &ImportRow, index: usize) -> Option<String> {
    Some(row.cell(index)).filter(|s| !s.is_empty()).map(str::to_string)
}

pub(crate) fn email(row: &ImportRow, index: usize, errors: &mut Vec<ValidationError>) -> Option<String> {
    let value = required_text(row, index, "Email", errors)?;
    if !is_valid_email(&value) {
        errors.push(row.error(
            ImportErrorKind::RowFieldInvalid,
            format!("'{}' is not a valid email address", value),
        ));
        return None;
    }
    Some(value)
}

pub(crate) fn date(
    row: &ImportRow,
    index: usize,
    label: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<NaiveDate> {
    let value = row.cell(index);
    let parsed = parse_date(value);
    if parsed.is_none() {
        errors.push(row.error(
            ImportErrorKind::RowType,
            format!("{} '{}' is not a date in YYYY-MM-DD format", label, value),
        ));
    }
    parsed
}

pub(crate) fn decimal_in_range(
    row: &ImportRow,
    index: usize,
    label: &str,
    range: &RangeInclusive<f64>,
    places: usize,
    errors: &mut Vec<ValidationError>,
) -> Option<f64> {
    let value = row.cell(index);
    let Some(parsed) = parse_decimal(value) else {
        errors.push(row.error(
            ImportErrorKind::RowType,
            format!("{} '{}' is not a number", label, value),
        ));
        return None;
    };
    if !in_range(parsed, range) {
        errors.push(row.error(
            ImportErrorKind::RowFieldInvalid,
            format!(
                "{} must be between {} and {} (got {})",
                label,
                range.start(),
                range.end(),
                value
            ),
        ));
        return None;
    }
    let fraction_digits = value.split_once('.').map_or(0, |(_, f)| f.len());
    if fraction_digits > places {
        errors.push(row.error(
            ImportErrorKind::RowFieldInvalid,
            format!(
                "{} '{}' must have at most {} decimal place{}",
                label,
                value,
                places,
                if places == 1 { "" } else { "s" }
            ),
        ));
        return None;
    }
    Some(parsed)
}

/// Empty cell gives `default`; negative values are rejected
pub(crate) fn optional_count(
    row: &ImportRow,
    index: usize,
    label: &str,
    default: i32,
    errors: &mut Vec<ValidationError>,
) -> Option<i32> {
    let value = row.cell(index);
    if value.is_empty() {
        return Some(default);
    }
    let Some(parsed) = parse_integer(value) else {
        errors.push(row.error(
            ImportErrorKind::RowType,
            format!("{} '{}' is not a whole number", label, value),
        ));
        return None;
    };
    if parsed < 0 {
        errors.push(row.error(
            ImportErrorKind::RowFieldInvalid,
            format!("{} cannot be negative (got {})", label, parsed),
        ));
        return None;
    }
    Some(parsed)
}

/// "Row N does not have precisely K fields"
pub fn arity_error(row: &ImportRow, expected: usize) -> ValidationError {
    ValidationError::new(
        row.number,
        ImportErrorKind::RowArity,
        format!("Row {} does not have precisely {} fields", row.number, expected),
    )
}

pub fn uniqueness_error(row: &ImportRow, field: UniqueField, value: &str, in_file: bool) -> ValidationError {
    let reason = if in_file {
        "appears more than once in this file"
    } else {
        "is already in use"
    };
    row.error(
        ImportErrorKind::RowUniquenessConflict,
        format!("{} '{}' {}", field.label(), value, reason),
    )
}
