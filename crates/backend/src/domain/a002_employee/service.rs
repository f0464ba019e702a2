use contracts::domain::a002_employee::aggregate::{Employee, EmployeeDto, EmployeeId, EmployeeProfile};
use sea_orm::{ConnectionTrait, DbErr};

use super::repository;
use crate::domain::a004_assessment::repository as assessment_repository;
use crate::shared::error::ServiceError;

pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Employee>> {
    repository::list_all(conn).await
}

/// Employee with the full assessment history
pub async fn get_profile<C: ConnectionTrait>(conn: &C, id: EmployeeId) -> Result<EmployeeProfile, ServiceError> {
    let employee = repository::get_by_id(conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("There is no employee with this id in the system"))?;
    let assessments = assessment_repository::list_for_employee(conn, id).await?;

    Ok(EmployeeProfile {
        employee,
        assessments,
    })
}

pub async fn create<C: ConnectionTrait>(conn: &C, dto: EmployeeDto) -> Result<EmployeeId, ServiceError> {
    let mut errors = match dto.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    if email_taken(conn, &dto).await? {
        errors.push(EMAIL_TAKEN.to_string());
    }

    if !errors.is_empty() {
        return Err(ServiceError::Validation(errors));
    }

    let id = insert(conn, &dto).await?;
    tracing::info!("Added employee {} ({})", dto.name.trim(), id.value());
    Ok(id)
}

const EMAIL_TAKEN: &str = "This email address is already registered. Please choose another";

async fn email_taken<C: ConnectionTrait>(conn: &C, dto: &EmployeeDto) -> Result<bool, DbErr> {
    let email = dto.email.trim();
    Ok(!email.is_empty() && repository::email_exists(conn, email).await?)
}

/// Insert, a concurrent insert of the same email is reported as the form error
async fn insert<C: ConnectionTrait>(conn: &C, dto: &EmployeeDto) -> Result<EmployeeId, ServiceError> {
    let e = match repository::insert(conn, dto).await {
        Ok(id) => return Ok(id),
        Err(e) => e,
    };
    if !email_taken(conn, dto).await? {
        return Err(e.into());
    }
    tracing::warn!("Insert of employee {} lost a race: {}", dto.email.trim(), e);
    Err(ServiceError::Validation(vec![EMAIL_TAKEN.to_string()]))
}
