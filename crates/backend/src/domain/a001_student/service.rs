use contracts::domain::a001_student::aggregate::{Student, StudentDto, StudentId};
use sea_orm::{ConnectionTrait, DbErr};

use super::repository;
use crate::shared::error::ServiceError;

pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Student>> {
    repository::list_all(conn).await
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: StudentId) -> anyhow::Result<Option<Student>> {
    repository::get_by_id(conn, id).await
}

/// Add a single student from the form
pub async fn create<C: ConnectionTrait>(conn: &C, dto: StudentDto) -> Result<StudentId, ServiceError> {
    let mut errors = match dto.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    errors.extend(taken_messages(conn, &dto).await?);

    if !errors.is_empty() {
        return Err(ServiceError::Validation(errors));
    }

    let id = insert(conn, &dto).await?;
    tracing::info!("Added student {} ({})", dto.username.trim(), id.value());
    Ok(id)
}

async fn taken_messages<C: ConnectionTrait>(conn: &C, dto: &StudentDto) -> Result<Vec<String>, DbErr> {
    let mut messages = Vec::new();
    let username = dto.username.trim();
    if !username.is_empty() && repository::username_exists(conn, username).await? {
        messages.push("This username is already taken. Please choose another".to_string());
    }
    let email = dto.email.trim();
    if !email.is_empty() && repository::email_exists(conn, email).await? {
        messages.push("This email address is already registered. Please choose another".to_string());
    }
    Ok(messages)
}

/// Insert, mapping a unique violation from a concurrent insert back to the form messages
async fn insert<C: ConnectionTrait>(conn: &C, dto: &StudentDto) -> Result<StudentId, ServiceError> {
    match repository::insert(conn, dto).await {
        Ok(id) => Ok(id),
        Err(e) => {
            let taken = taken_messages(conn, dto).await?;
            if taken.is_empty() {
                return Err(e.into());
            }
            tracing::warn!("Insert of student {} lost a race: {}", dto.username.trim(), e);
            Err(ServiceError::Validation(taken))
        }
    }
}

/// Flip the active flag, returns the new state
pub async fn toggle_active<C: ConnectionTrait>(conn: &C, id: StudentId) -> Result<bool, ServiceError> {
    let student = repository::get_by_id(conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("There is no student with this id in the system"))?;

    let active = !student.active;
    repository::set_active(conn, id, active).await?;
    tracing::info!(
        "Student {} ({}) {}",
        student.display_name(),
        student.username,
        if active { "activated" } else { "deactivated" }
    );
    Ok(active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::open_in_memory;

    fn dto(username: &str, email: &str) -> StudentDto {
        StudentDto {
            username: username.into(),
            email: email.into(),
            firstname: Some("  ".into()),
            lastname: "Lovelace".into(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let conn = open_in_memory().await;
        let id = create(&conn, dto("ada", "ada@school.org")).await.unwrap();

        let student = get_by_id(&conn, id).await.unwrap().unwrap();
        assert!(student.active);
        assert_eq!(student.firstname, None);
        assert!(student.created_at.is_some());
        assert_eq!(list_all(&conn).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email_rejected() {
        let conn = open_in_memory().await;
        create(&conn, dto("ada", "ada@school.org")).await.unwrap();

        let err = create(&conn, dto("ada", "ada@school.org")).await.unwrap_err();
        assert_eq!(err.messages().len(), 2);
        assert_eq!(list_all(&conn).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_conflict_reported_as_form_error() {
        let conn = open_in_memory().await;
        repository::insert(&conn, &dto("ada", "ada@school.org")).await.unwrap();

        let err = insert(&conn, &dto("ada", "lovelace@school.org")).await.unwrap_err();
        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors, vec!["This username is already taken. Please choose another"]);
        assert_eq!(list_all(&conn).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_active() {
        let conn = open_in_memory().await;
        let id = create(&conn, dto("ada", "ada@school.org")).await.unwrap();

        assert!(!toggle_active(&conn, id).await.unwrap());
        assert!(toggle_active(&conn, id).await.unwrap());
        assert!(matches!(
            toggle_active(&conn, StudentId(999)).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
