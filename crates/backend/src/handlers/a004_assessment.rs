use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a002_employee::aggregate::EmployeeId;
use contracts::domain::a004_assessment::aggregate::AssessmentDto;
use serde_json::json;

use crate::domain::a004_assessment;
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceError;
use crate::system::auth::extractor::CurrentUser;

/// POST /api/employees/:id/assessments
pub async fn create(
    current: CurrentUser,
    Path(employee_id): Path<i32>,
    Json(dto): Json<AssessmentDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServiceError> {
    let id = a004_assessment::service::record(
        get_connection(),
        EmployeeId::new(employee_id),
        dto,
        &current.username,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id.0 }))))
}
