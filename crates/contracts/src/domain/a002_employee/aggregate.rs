use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a004_assessment::aggregate::Assessment;
use crate::shared::validation::{fits_places, in_range, is_valid_email, EXPERIENCE_PLACES, EXPERIENCE_RANGE};

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub i32);

impl EmployeeId {
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

/// Employee tracked for skills and performance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    #[serde(rename = "dateOfJoining")]
    pub date_of_joining: NaiveDate,
    #[serde(rename = "currentRole")]
    pub current_role: String,
    #[serde(rename = "pastRoles")]
    pub past_roles: Option<String>,
    pub skills: String,
    /// Years of experience, one decimal place
    pub experience: f64,
    #[serde(rename = "educationalBackground")]
    pub educational_background: String,
    #[serde(rename = "skillPoints")]
    pub skill_points: i32,
    #[serde(rename = "achievementBadge")]
    pub achievement_badge: Option<String>,
}

/// Employee with the assessments recorded for them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub employee: Employee,
    pub assessments: Vec<Assessment>,
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// New employee, entered by hand or parsed from one upload row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDto {
    pub name: String,
    pub email: String,
    #[serde(rename = "dateOfJoining")]
    pub date_of_joining: NaiveDate,
    #[serde(rename = "currentRole")]
    pub current_role: String,
    #[serde(rename = "pastRoles", default)]
    pub past_roles: Option<String>,
    #[serde(default)]
    pub skills: String,
    pub experience: f64,
    #[serde(rename = "educationalBackground", default)]
    pub educational_background: String,
    #[serde(rename = "skillPoints", default)]
    pub skill_points: i32,
    #[serde(rename = "achievementBadge", default)]
    pub achievement_badge: Option<String>,
}

impl EmployeeDto {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Name is required".to_string());
        }
        if self.email.trim().is_empty() {
            errors.push("Email is required".to_string());
        } else if !is_valid_email(self.email.trim()) {
            errors.push("Invalid email address".to_string());
        }
        if self.current_role.trim().is_empty() {
            errors.push("Current Role is required".to_string());
        }
        if !self.experience.is_finite() || !in_range(self.experience, &EXPERIENCE_RANGE) {
            errors.push("Experience must be between 0 and 999.9 years".to_string());
        } else if !fits_places(self.experience, EXPERIENCE_PLACES) {
            errors.push("Experience must have at most 1 decimal place".to_string());
        }
        if self.skill_points < 0 {
            errors.push("Skill Points cannot be negative".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
