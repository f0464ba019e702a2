use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a002_employee::aggregate::EmployeeId;
use crate::shared::validation::is_valid_rating;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub i32);

/// Performance assessment of one employee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    #[serde(rename = "employeeId")]
    pub employee_id: EmployeeId,
    pub technical: i32,
    pub communication: i32,
    pub teamwork: i32,
    pub comment: Option<String>,
    #[serde(rename = "assessedBy")]
    pub assessed_by: String,
    #[serde(rename = "assessedAt")]
    pub assessed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentDto {
    pub technical: i32,
    pub communication: i32,
    pub teamwork: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

impl AssessmentDto {
    /// One message per rating outside 1..=10
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let errors: Vec<String> = [
            ("Technical", self.technical),
            ("Communication", self.communication),
            ("Teamwork", self.teamwork),
        ]
        .into_iter()
        .filter(|(_, value)| !is_valid_rating(*value))
        .map(|(label, value)| format!("{} rating must be between 1 and 10 (got {})", label, value))
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Skill points awarded for this assessment
    pub fn points(&self) -> i32 {
        self.technical + self.communication + self.teamwork
    }
}
