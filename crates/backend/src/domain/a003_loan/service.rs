use contracts::domain::a001_student::aggregate::StudentId;
use contracts::domain::a003_loan::aggregate::{parse_positive_id, BorrowDto, Loan, LoanId, ReturnDto};
use sea_orm::ConnectionTrait;

use super::repository;
use crate::domain::a001_student::repository as student_repository;
use crate::shared::error::ServiceError;

const NOT_POSITIVE: &str = "This must be a positive integer";

pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Loan>> {
    repository::list_all(conn).await
}

/// Lend a device to a student
///
/// Student and device are checked independently, every failed rule is reported.
pub async fn borrow<C: ConnectionTrait>(conn: &C, dto: BorrowDto) -> Result<LoanId, ServiceError> {
    let mut errors = Vec::new();

    let student_id = parse_positive_id(&dto.student_id).map(StudentId);
    match student_id {
        None => errors.push(format!("Student Id: {}", NOT_POSITIVE)),
        Some(id) => match student_repository::get_by_id(conn, id).await? {
            None => errors.push("There is no student with this id in the system".to_string()),
            Some(student) if !student.active => errors
                .push("This student has been deactivated and cannot borrow devices".to_string()),
            Some(_) => {
                if repository::open_loan_for_student(conn, id).await?.is_some() {
                    errors.push(
                        "This student cannot borrow another item until the previous loan has been returned"
                            .to_string(),
                    );
                }
            }
        },
    }

    let device_id = parse_positive_id(&dto.device_id);
    match device_id {
        None => errors.push(format!("Device Id: {}", NOT_POSITIVE)),
        Some(device) => {
            if repository::open_loan_for_device(conn, device).await?.is_some() {
                errors.push("This device cannot be borrowed as it is currently on loan".to_string());
            }
        }
    }

    let (Some(student_id), Some(device_id), true) = (student_id, device_id, errors.is_empty()) else {
        return Err(ServiceError::Validation(errors));
    };

    let id = repository::insert(conn, student_id, device_id).await?;
    tracing::info!("Device {} lent to student {}", device_id, student_id.value());
    Ok(id)
}

/// Close the open loan of a device, returns the closed loan
pub async fn return_device<C: ConnectionTrait>(conn: &C, dto: ReturnDto) -> Result<Loan, ServiceError> {
    let device_id = parse_positive_id(&dto.device_id)
        .ok_or_else(|| ServiceError::validation(format!("Device Id: {}", NOT_POSITIVE)))?;

    let mut loan = repository::open_loan_for_device(conn, device_id)
        .await?
        .ok_or_else(|| ServiceError::validation("This device is not currently on loan"))?;

    repository::close(conn, loan.id).await?;
    loan.returned_at = Some(chrono::Utc::now());
    tracing::info!("Device {} returned by student {}", device_id, loan.student_id.value());
    Ok(loan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_student::service as student_service;
    use crate::shared::data::db::open_in_memory;
    use contracts::domain::a001_student::aggregate::StudentDto;
    use sea_orm::DatabaseConnection;

    async fn student(conn: &DatabaseConnection, username: &str) -> StudentId {
        student_service::create(
            conn,
            StudentDto {
                username: username.into(),
                email: format!("{}@school.org", username),
                firstname: None,
                lastname: "Pupil".into(),
            },
        )
        .await
        .unwrap()
    }

    fn borrow_dto(student: StudentId, device: &str) -> BorrowDto {
        BorrowDto {
            student_id: student.value().to_string(),
            device_id: device.into(),
        }
    }

    #[tokio::test]
    async fn test_borrow_and_return() {
        let conn = open_in_memory().await;
        let alice = student(&conn, "alice").await;

        borrow(&conn, borrow_dto(alice, "17")).await.unwrap();
        let loans = list_all(&conn).await.unwrap();
        assert_eq!(loans.len(), 1);
        assert!(loans[0].is_open());

        let returned = return_device(&conn, ReturnDto { device_id: "17".into() })
            .await
            .unwrap();
        assert_eq!(returned.student_id, alice);
        assert!(!list_all(&conn).await.unwrap()[0].is_open());

        // After the return both student and device are free again
        borrow(&conn, borrow_dto(alice, "17")).await.unwrap();
    }

    #[tokio::test]
    async fn test_student_with_open_loan_cannot_borrow() {
        let conn = open_in_memory().await;
        let alice = student(&conn, "alice").await;
        borrow(&conn, borrow_dto(alice, "1")).await.unwrap();

        let err = borrow(&conn, borrow_dto(alice, "2")).await.unwrap_err();
        assert_eq!(
            err.messages(),
            vec!["This student cannot borrow another item until the previous loan has been returned"]
        );
    }

    #[tokio::test]
    async fn test_device_on_loan_cannot_be_borrowed() {
        let conn = open_in_memory().await;
        let alice = student(&conn, "alice").await;
        let bob = student(&conn, "bob").await;
        borrow(&conn, borrow_dto(alice, "5")).await.unwrap();

        let err = borrow(&conn, borrow_dto(bob, "5")).await.unwrap_err();
        assert_eq!(
            err.messages(),
            vec!["This device cannot be borrowed as it is currently on loan"]
        );
    }

    #[tokio::test]
    async fn test_deactivated_student_cannot_borrow() {
        let conn = open_in_memory().await;
        let alice = student(&conn, "alice").await;
        student_service::toggle_active(&conn, alice).await.unwrap();

        let err = borrow(&conn, borrow_dto(alice, "3")).await.unwrap_err();
        assert_eq!(
            err.messages(),
            vec!["This student has been deactivated and cannot borrow devices"]
        );
    }

    #[tokio::test]
    async fn test_bad_ids_reported_together() {
        let conn = open_in_memory().await;
        let err = borrow(
            &conn,
            BorrowDto {
                student_id: "abc".into(),
                device_id: "-1".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.messages().len(), 2);

        let err = borrow(&conn, borrow_dto(StudentId(99), "4")).await.unwrap_err();
        assert_eq!(err.messages(), vec!["There is no student with this id in the system"]);
    }

    #[tokio::test]
    async fn test_return_of_device_not_on_loan() {
        let conn = open_in_memory().await;
        let err = return_device(&conn, ReturnDto { device_id: "8".into() })
            .await
            .unwrap_err();
        assert_eq!(err.messages(), vec!["This device is not currently on loan"]);
    }
}
