use contracts::domain::a002_employee::aggregate::EmployeeId;
use contracts::domain::a004_assessment::aggregate::{AssessmentDto, AssessmentId};
use sea_orm::{ConnectionTrait, TransactionTrait};

use super::repository;
use crate::domain::a002_employee::repository as employee_repository;
use crate::shared::error::ServiceError;

/// Record a performance assessment
///
/// The assessment row and the skill-point increase are written in one transaction.
pub async fn record<C>(
    conn: &C,
    employee_id: EmployeeId,
    dto: AssessmentDto,
    assessed_by: &str,
) -> Result<AssessmentId, ServiceError>
where
    C: ConnectionTrait + TransactionTrait,
{
    dto.validate().map_err(ServiceError::Validation)?;

    if employee_repository::get_by_id(conn, employee_id).await?.is_none() {
        return Err(ServiceError::not_found(
            "There is no employee with this id in the system",
        ));
    }

    let txn = conn.begin().await?;
    let id = repository::insert(&txn, employee_id, &dto, assessed_by).await?;
    employee_repository::add_skill_points(&txn, employee_id, dto.points()).await?;
    txn.commit().await?;

    tracing::info!(
        "Assessment {} recorded for employee {} by {} (+{} points)",
        id.0,
        employee_id.value(),
        assessed_by,
        dto.points()
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a002_employee::service as employee_service;
    use crate::shared::data::db::open_in_memory;
    use chrono::NaiveDate;
    use contracts::domain::a002_employee::aggregate::EmployeeDto;

    fn ratings(technical: i32, communication: i32, teamwork: i32) -> AssessmentDto {
        AssessmentDto {
            technical,
            communication,
            teamwork,
            comment: Some("quarterly review".into()),
        }
    }

    async fn employee(conn: &sea_orm::DatabaseConnection) -> EmployeeId {
        employee_service::create(
            conn,
            EmployeeDto {
                name: "Linus".into(),
                email: "linus@corp.io".into(),
                date_of_joining: NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(),
                current_role: "Maintainer".into(),
                past_roles: None,
                skills: "C".into(),
                experience: 30.0,
                educational_background: "MSc".into(),
                skill_points: 0,
                achievement_badge: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_assessment_adds_skill_points() {
        let conn = open_in_memory().await;
        let id = employee(&conn).await;

        record(&conn, id, ratings(7, 8, 9), "manager").await.unwrap();
        record(&conn, id, ratings(1, 1, 1), "manager").await.unwrap();

        let profile = employee_service::get_profile(&conn, id).await.unwrap();
        assert_eq!(profile.employee.skill_points, 27);
        assert_eq!(profile.assessments.len(), 2);
        assert_eq!(profile.assessments[0].technical, 1);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_rejected() {
        let conn = open_in_memory().await;
        let id = employee(&conn).await;

        let err = record(&conn, id, ratings(0, 5, 11), "manager").await.unwrap_err();
        assert_eq!(err.messages().len(), 2);

        let profile = employee_service::get_profile(&conn, id).await.unwrap();
        assert_eq!(profile.employee.skill_points, 0);
        assert!(profile.assessments.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_employee() {
        let conn = open_in_memory().await;
        assert!(matches!(
            record(&conn, EmployeeId(7), ratings(5, 5, 5), "manager").await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
