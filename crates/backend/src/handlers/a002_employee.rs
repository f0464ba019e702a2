use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a002_employee::aggregate::{Employee, EmployeeDto, EmployeeId, EmployeeProfile};
use serde_json::json;

use crate::domain::a002_employee;
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceError;

/// GET /api/employees
pub async fn list_all() -> Result<Json<Vec<Employee>>, StatusCode> {
    match a002_employee::service::list_all(get_connection()).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list employees: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/employees/:id
pub async fn get_profile(Path(id): Path<i32>) -> Result<Json<EmployeeProfile>, ServiceError> {
    let profile = a002_employee::service::get_profile(get_connection(), EmployeeId::new(id)).await?;
    Ok(Json(profile))
}

/// POST /api/employees
pub async fn create(
    Json(dto): Json<EmployeeDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServiceError> {
    let id = a002_employee::service::create(get_connection(), dto).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id.value() }))))
}
