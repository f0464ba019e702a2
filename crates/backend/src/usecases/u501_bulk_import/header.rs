use contracts::usecases::u501_bulk_import::{ImportErrorKind, ValidationError};

const BOM: char = '\u{feff}';

/// Header row of the upload, always row 1
pub const HEADER_ROW: usize = 1;

/// Exact, order-sensitive comparison of the first line with the expected columns
///
/// Cells are compared trimmed, a leading UTF-8 BOM is ignored. An empty file has
/// an empty header and never matches.
pub fn check_header(actual: &[String], expected: &[&str]) -> Result<(), ValidationError> {
    let matches = actual.len() == expected.len()
        && actual
            .iter()
            .enumerate()
            .zip(expected)
            .all(|((i, cell), want)| {
                let cell = if i == 0 { cell.trim_start_matches(BOM) } else { cell };
                cell.trim() == *want
            });

    if matches {
        Ok(())
    } else {
        Err(ValidationError::new(
            HEADER_ROW,
            ImportErrorKind::HeaderMismatch,
            format!(
                "The first row of the file must be exactly: {}",
                expected.join(", ")
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &[&str] = &["Username", "Email", "Firstname", "Lastname"];

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_header_accepted() {
        assert!(check_header(&cells(EXPECTED), EXPECTED).is_ok());
        assert!(check_header(&cells(&["\u{feff}Username", " Email ", "Firstname", "Lastname"]), EXPECTED).is_ok());
    }

    #[test]
    fn test_mismatch() {
        let err = check_header(&cells(&["Email", "Username", "Firstname", "Lastname"]), EXPECTED).unwrap_err();
        assert_eq!(err.row, 1);
        assert_eq!(err.kind, ImportErrorKind::HeaderMismatch);
        assert!(err.message.contains("Username, Email, Firstname, Lastname"));

        assert!(check_header(&cells(&["Username", "Email", "Firstname"]), EXPECTED).is_err());
        assert!(check_header(&cells(&["username", "email", "firstname", "lastname"]), EXPECTED).is_err());
        assert!(check_header(&[], EXPECTED).is_err());
    }
}
