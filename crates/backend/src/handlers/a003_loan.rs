use axum::{http::StatusCode, Json};
use contracts::domain::a003_loan::aggregate::{BorrowDto, Loan, ReturnDto};
use serde_json::json;

use crate::domain::a003_loan;
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceError;

/// GET /api/loans
pub async fn list_all() -> Result<Json<Vec<Loan>>, StatusCode> {
    match a003_loan::service::list_all(get_connection()).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list loans: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/loans
pub async fn borrow(
    Json(dto): Json<BorrowDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServiceError> {
    let id = a003_loan::service::borrow(get_connection(), dto).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id.0 }))))
}

/// POST /api/loans/return
pub async fn return_device(Json(dto): Json<ReturnDto>) -> Result<Json<Loan>, ServiceError> {
    let loan = a003_loan::service::return_device(get_connection(), dto).await?;
    Ok(Json(loan))
}
