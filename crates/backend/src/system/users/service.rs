use anyhow::Result;
use chrono::Utc;
use contracts::shared::validation::is_valid_email;
use contracts::system::users::{RegisterDto, User};
use sea_orm::ConnectionTrait;

use super::repository;
use crate::shared::error::ServiceError;
use crate::system::auth::password;

/// Register a new account, returns the new user id
///
/// All problems with the form are reported at once.
pub async fn register<C: ConnectionTrait>(conn: &C, dto: RegisterDto) -> Result<String, ServiceError> {
    let username = dto.username.trim().to_string();
    let email = dto.email.trim().to_string();
    let mut errors = Vec::new();

    if username.is_empty() {
        errors.push("Username is required".to_string());
    }
    if email.is_empty() {
        errors.push("Email is required".to_string());
    } else if !is_valid_email(&email) {
        errors.push("Invalid email address".to_string());
    }
    let checked_email = if is_valid_email(&email) { email.as_str() } else { "" };
    errors.extend(taken_messages(conn, &username, checked_email).await?);

    if let Err(e) = password::validate_password_strength(&dto.password) {
        errors.push(e.to_string());
    }
    if dto.password != dto.confirm_password {
        errors.push("Passwords must match".to_string());
    }

    if !errors.is_empty() {
        return Err(ServiceError::Validation(errors));
    }

    let password_hash = password::hash_password(&dto.password)?;
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username,
        email,
        created_at: Utc::now().to_rfc3339(),
        last_login_at: None,
    };

    insert_user(conn, &user, &password_hash).await?;
    tracing::info!("Registered user {}", user.username);

    Ok(user.id)
}

/// Messages for a username or email already in the store, blank values are skipped
async fn taken_messages<C: ConnectionTrait>(conn: &C, username: &str, email: &str) -> Result<Vec<String>> {
    let mut messages = Vec::new();
    if !username.is_empty() && repository::get_by_username(conn, username).await?.is_some() {
        messages.push("This username is already taken. Please choose another".to_string());
    }
    if !email.is_empty() && repository::get_by_email(conn, email).await?.is_some() {
        messages.push("This email address is already registered. Please choose another".to_string());
    }
    Ok(messages)
}

/// Insert the account, a concurrent registration that took the username or
/// email first is reported as a form error
async fn insert_user<C: ConnectionTrait>(conn: &C, user: &User, password_hash: &str) -> Result<(), ServiceError> {
    let Err(e) = repository::create_with_password(conn, user, password_hash).await else {
        return Ok(());
    };

    let taken = taken_messages(conn, &user.username, &user.email).await?;
    if taken.is_empty() {
        return Err(e.into());
    }
    tracing::warn!("Registration of {} lost a race: {}", user.username, e);
    Err(ServiceError::Validation(taken))
}

/// Verify user credentials
///
/// Returns `None` for an unknown username or a wrong password.
pub async fn verify_credentials<C: ConnectionTrait>(
    conn: &C,
    username: &str,
    password_plain: &str,
) -> Result<Option<User>> {
    let Some(user) = repository::get_by_username(conn, username.trim()).await? else {
        return Ok(None);
    };

    let Some(stored_hash) = repository::get_password_hash(conn, &user.id).await? else {
        return Ok(None);
    };

    if !password::verify_password(password_plain, &stored_hash)? {
        return Ok(None);
    }

    repository::update_last_login(conn, &user.id).await?;
    Ok(Some(user))
}

/// Get user by ID
pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: &str) -> Result<Option<User>> {
    repository::get_by_id(conn, id).await
}
