use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a001_student::aggregate::{Student, StudentDto, StudentId};
use serde_json::json;

use crate::domain::a001_student;
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceError;

/// GET /api/students
pub async fn list_all() -> Result<Json<Vec<Student>>, StatusCode> {
    match a001_student::service::list_all(get_connection()).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list students: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/students/:id
pub async fn get_by_id(Path(id): Path<i32>) -> Result<Json<Student>, StatusCode> {
    match a001_student::service::get_by_id(get_connection(), StudentId::new(id)).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/students
pub async fn create(
    Json(dto): Json<StudentDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServiceError> {
    let id = a001_student::service::create(get_connection(), dto).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id.value() }))))
}

/// POST /api/students/:id/toggle-active
pub async fn toggle_active(Path(id): Path<i32>) -> Result<Json<serde_json::Value>, ServiceError> {
    let active = a001_student::service::toggle_active(get_connection(), StudentId::new(id)).await?;
    Ok(Json(json!({ "id": id, "active": active })))
}
