use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a001_student::aggregate::StudentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(pub i32);

/// Device lent to a student; open until `returned_at` is set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    #[serde(rename = "deviceId")]
    pub device_id: i32,
    #[serde(rename = "studentId")]
    pub student_id: StudentId,
    #[serde(rename = "borrowedAt")]
    pub borrowed_at: DateTime<Utc>,
    #[serde(rename = "returnedAt")]
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// Borrow form. Ids arrive as text and are checked server side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowDto {
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(rename = "deviceId")]
    pub device_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnDto {
    #[serde(rename = "deviceId")]
    pub device_id: String,
}

/// Parses a form id: digits only, greater than zero
pub fn parse_positive_id(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse::<i32>().ok().filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("42"), Some(42));
        assert_eq!(parse_positive_id(" 7 "), Some(7));
        assert_eq!(parse_positive_id("0"), None);
        assert_eq!(parse_positive_id("-3"), None);
        assert_eq!(parse_positive_id("4.2"), None);
        assert_eq!(parse_positive_id("abc"), None);
        assert_eq!(parse_positive_id("99999999999"), None);
    }
}
