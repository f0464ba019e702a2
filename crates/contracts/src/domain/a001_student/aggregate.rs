use serde::{Deserialize, Serialize};

use crate::shared::validation::is_valid_email;

// ============================================================================
// ID Type
// ============================================================================

/// Identifier of a student (INTEGER primary key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub i32);

impl StudentId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Student who may borrow devices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub username: String,
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: String,
    /// Deactivated students cannot borrow devices
    pub active: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Student {
    pub fn display_name(&self) -> String {
        match self.firstname.as_deref() {
            Some(first) if !first.trim().is_empty() => format!("{} {}", first, self.lastname),
            _ => self.lastname.clone(),
        }
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// New student, entered by hand or parsed from one upload row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StudentDto {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub firstname: Option<String>,
    pub lastname: String,
}

impl StudentDto {
    /// Field checks that do not need the database
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push("Username is required".to_string());
        }
        if self.email.trim().is_empty() {
            errors.push("Email is required".to_string());
        } else if !is_valid_email(self.email.trim()) {
            errors.push("Invalid email address".to_string());
        }
        if self.lastname.trim().is_empty() {
            errors.push("Lastname is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> StudentDto {
        StudentDto {
            username: "alice".into(),
            email: "alice@x.com".into(),
            firstname: Some("Alice".into()),
            lastname: "A".into(),
        }
    }

    #[test]
    fn test_valid_dto() {
        assert!(dto().validate().is_ok());
    }

    #[test]
    fn test_collects_every_problem() {
        let bad = StudentDto {
            username: " ".into(),
            email: "nope".into(),
            firstname: None,
            lastname: String::new(),
        };
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_display_name() {
        let student = Student {
            id: StudentId(1),
            username: "alice".into(),
            email: "alice@x.com".into(),
            firstname: None,
            lastname: "Anders".into(),
            active: true,
            created_at: None,
        };
        assert_eq!(student.display_name(), "Anders");
    }
}
