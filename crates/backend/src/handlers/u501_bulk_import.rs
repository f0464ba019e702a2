use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::usecases::u501_bulk_import::{ImportEntity, ImportReport, ImportStatus};
use serde_json::json;

use crate::shared::config;
use crate::shared::data::db::get_connection;
use crate::usecases::u501_bulk_import::upload::has_allowed_extension;
use crate::usecases::u501_bulk_import::BulkImportExecutor;

const FILE_FIELD: &str = "file";

/// POST /api/students/upload
pub async fn upload_students(multipart: Multipart) -> Response {
    upload(ImportEntity::Students, multipart).await
}

/// POST /api/employees/upload
pub async fn upload_employees(multipart: Multipart) -> Response {
    upload(ImportEntity::Employees, multipart).await
}

async fn upload(entity: ImportEntity, mut multipart: Multipart) -> Response {
    let (file_name, contents) = match read_file_field(&mut multipart).await {
        Ok(v) => v,
        Err(response) => return response,
    };

    let upload_dir = config::get_upload_dir(config::get());
    let report = BulkImportExecutor::new(get_connection(), upload_dir)
        .execute(entity, &file_name, &contents)
        .await;

    (report_status(&report), Json(report)).into_response()
}

fn report_status(report: &ImportReport) -> StatusCode {
    match report.status {
        ImportStatus::Committed => StatusCode::OK,
        ImportStatus::Rejected => StatusCode::UNPROCESSABLE_ENTITY,
        ImportStatus::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Name and bytes of the `file` part
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), Response> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().trim().to_string();
        if file_name.is_empty() {
            return Err(form_error("No file selected"));
        }
        if !has_allowed_extension(&file_name) {
            return Err(form_error("Only .csv files can be uploaded"));
        }

        let contents = field.bytes().await.map_err(multipart_error)?;
        return Ok((file_name, contents));
    }

    Err(form_error("No file part in the request"))
}

fn form_error(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "errors": [message] }))).into_response()
}

/// Body limit violations come through here as 413
fn multipart_error(e: MultipartError) -> Response {
    let status = e.status();
    tracing::warn!("Rejected upload: {} ({})", e.body_text(), status);
    (status, Json(json!({ "errors": [e.body_text()] }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_status() {
        let mut report = ImportReport {
            entity: ImportEntity::Students,
            status: ImportStatus::Committed,
            rows_scanned: 0,
            committed: 0,
            errors: Vec::new(),
            message: String::new(),
        };
        assert_eq!(report_status(&report), StatusCode::OK);
        report.status = ImportStatus::Rejected;
        assert_eq!(report_status(&report), StatusCode::UNPROCESSABLE_ENTITY);
        report.status = ImportStatus::Failed;
        assert_eq!(report_status(&report), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_form_error_is_bad_request() {
        assert_eq!(form_error("No file selected").status(), StatusCode::BAD_REQUEST);
    }
}
