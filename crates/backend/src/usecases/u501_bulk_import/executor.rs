use contracts::usecases::u501_bulk_import::{ImportEntity, ImportReport, ImportStatus};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;

use super::employees::EmployeeSchema;
use super::error::ImportError;
use super::gateway::{PersistRecord, SeaOrmStore};
use super::importer::{BatchImporter, ImportRun};
use super::schema::ImportSchema;
use super::students::StudentSchema;
use super::upload::TempUpload;

/// Executor for bulk CSV uploads
pub struct BulkImportExecutor<'a> {
    conn: &'a DatabaseConnection,
    upload_dir: PathBuf,
}

impl<'a> BulkImportExecutor<'a> {
    pub fn new(conn: &'a DatabaseConnection, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            conn,
            upload_dir: upload_dir.into(),
        }
    }

    /// Import an uploaded file; always produces a report
    ///
    /// Infrastructure failures are logged and reported as `Failed`.
    pub async fn execute(&self, entity: ImportEntity, file_name: &str, contents: &[u8]) -> ImportReport {
        let result = match entity {
            ImportEntity::Students => self.import::<StudentSchema>(file_name, contents).await,
            ImportEntity::Employees => self.import::<EmployeeSchema>(file_name, contents).await,
        };

        match result {
            Ok(run) => run.into_report(),
            Err(e) => {
                tracing::error!("Import of {} from {} failed: {}", entity.label(), file_name, e);
                ImportReport {
                    entity,
                    status: ImportStatus::Failed,
                    rows_scanned: 0,
                    committed: 0,
                    errors: Vec::new(),
                    message: "The upload could not be processed, nothing was imported".to_string(),
                }
            }
        }
    }

    async fn import<S>(&self, file_name: &str, contents: &[u8]) -> Result<ImportRun, ImportError>
    where
        S: ImportSchema,
        S::Record: PersistRecord,
    {
        let upload = TempUpload::create(&self.upload_dir, file_name, contents)?;
        let store = SeaOrmStore::new(self.conn);

        BatchImporter::<S, _>::new(&store).run(upload.open()?).await
        // upload dropped here, removing the file on every path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{a001_student, a002_employee};
    use crate::shared::data::db::open_in_memory;
    use contracts::usecases::u501_bulk_import::ImportErrorKind;
    use crate::usecases::u501_bulk_import::importer::SAVE_FAILED_MESSAGE;
    use sea_orm::ConnectionTrait;

    const STUDENTS: &str = "Username,Email,Firstname,Lastname\n\
                            alice,alice@x.com,Alice,Anders\n\
                            bob,bob@x.com,,Brown\n";

    fn upload_dir_is_empty(dir: &std::path::Path) -> bool {
        std::fs::read_dir(dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(true)
    }

    #[tokio::test]
    async fn test_students_committed_then_rerun_rejected() {
        let conn = open_in_memory().await;
        let dir = tempfile::tempdir().unwrap();
        let executor = BulkImportExecutor::new(&conn, dir.path());

        let report = executor
            .execute(ImportEntity::Students, "students.csv", STUDENTS.as_bytes())
            .await;
        assert_eq!(report.status, ImportStatus::Committed);
        assert_eq!(report.committed, 2);
        assert_eq!(a001_student::service::list_all(&conn).await.unwrap().len(), 2);
        assert!(upload_dir_is_empty(dir.path()));

        let report = executor
            .execute(ImportEntity::Students, "students.csv", STUDENTS.as_bytes())
            .await;
        assert_eq!(report.status, ImportStatus::Rejected);
        assert_eq!(report.committed, 0);
        assert_eq!(report.errors.len(), 4);
        assert!(report
            .errors
            .iter()
            .all(|e| e.kind == ImportErrorKind::RowUniquenessConflict));
        assert_eq!(a001_student::service::list_all(&conn).await.unwrap().len(), 2);
        assert!(upload_dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_duplicate_inside_file_persists_nothing() {
        let conn = open_in_memory().await;
        let dir = tempfile::tempdir().unwrap();
        let csv = "Username,Email,Firstname,Lastname\n\
                   alice,alice@x.com,Alice,A\n\
                   alice,bob@x.com,Alice,A\n";

        let report = BulkImportExecutor::new(&conn, dir.path())
            .execute(ImportEntity::Students, "students.csv", csv.as_bytes())
            .await;
        assert_eq!(report.status, ImportStatus::Rejected);
        assert_eq!(report.errors[0].row, 3);
        assert!(a001_student::service::list_all(&conn).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_employees_imported_with_defaults() {
        let conn = open_in_memory().await;
        let dir = tempfile::tempdir().unwrap();
        let csv = "Name,Email,Date of Joining,Current Role,Past Roles,Skills,Experience,Educational Background,Skill Points,Achievement Badge\n\
                   Ann Lee,ann@corp.io,2020-01-06,Developer,,Rust,3.5,BSc,,\n\
                   Ben Ode,ben@corp.io,2018-05-14,Lead,Developer,Go,8,MSc,40,Mentor\n";

        let report = BulkImportExecutor::new(&conn, dir.path())
            .execute(ImportEntity::Employees, "staff.csv", csv.as_bytes())
            .await;
        assert_eq!(report.status, ImportStatus::Committed, "{:?}", report.errors);
        assert_eq!(report.committed, 2);

        let employees = a002_employee::service::list_all(&conn).await.unwrap();
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].name, "Ann Lee");
        assert_eq!(employees[0].skill_points, 0);
        assert_eq!(employees[0].achievement_badge, None);
        assert_eq!(employees[1].past_roles.as_deref(), Some("Developer"));
        assert_eq!(employees[1].skill_points, 40);
    }

    #[tokio::test]
    async fn test_header_mismatch_report() {
        let conn = open_in_memory().await;
        let dir = tempfile::tempdir().unwrap();

        let report = BulkImportExecutor::new(&conn, dir.path())
            .execute(ImportEntity::Employees, "staff.csv", STUDENTS.as_bytes())
            .await;
        assert_eq!(report.status, ImportStatus::Rejected);
        assert_eq!(report.rows_scanned, 0);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ImportErrorKind::HeaderMismatch);
    }

    #[tokio::test]
    async fn test_save_failure_rolls_back_and_removes_upload() {
        let conn = open_in_memory().await;
        let dir = tempfile::tempdir().unwrap();
        conn.execute_unprepared(
            "CREATE TRIGGER block_bob BEFORE INSERT ON a001_student
             WHEN NEW.username = 'bob'
             BEGIN SELECT RAISE(ABORT, 'blocked'); END",
        )
        .await
        .unwrap();

        let report = BulkImportExecutor::new(&conn, dir.path())
            .execute(ImportEntity::Students, "students.csv", STUDENTS.as_bytes())
            .await;
        assert_eq!(report.status, ImportStatus::Failed);
        assert_eq!(report.committed, 0);
        assert_eq!(report.message, SAVE_FAILED_MESSAGE);
        // alice went in first, the rollback removes her too
        assert!(a001_student::service::list_all(&conn).await.unwrap().is_empty());
        assert!(upload_dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_lookup_failure_reported_and_upload_removed() {
        let conn = open_in_memory().await;
        let dir = tempfile::tempdir().unwrap();
        conn.execute_unprepared("DROP TABLE a002_employee").await.unwrap();
        let csv = "Name,Email,Date of Joining,Current Role,Past Roles,Skills,Experience,Educational Background,Skill Points,Achievement Badge\n\
                   Ann Lee,ann@corp.io,2020-01-06,Developer,,Rust,3.5,BSc,,\n";

        let report = BulkImportExecutor::new(&conn, dir.path())
            .execute(ImportEntity::Employees, "staff.csv", csv.as_bytes())
            .await;
        assert_eq!(report.status, ImportStatus::Failed);
        assert_eq!(report.committed, 0);
        assert!(report.errors.is_empty());
        assert_eq!(
            report.message,
            "The upload could not be processed, nothing was imported"
        );
        assert!(upload_dir_is_empty(dir.path()));
    }
}
