use anyhow::Result;
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use sha2::{Digest, Sha256};

use super::jwt;

/// Store a refresh token, only its SHA-256 hash is persisted
pub async fn store<C: ConnectionTrait>(conn: &C, user_id: &str, token: &str) -> Result<()> {
    let token_id = uuid::Uuid::new_v4().to_string();
    let expires_at = jwt::calculate_refresh_token_expiration();
    let created_at = Utc::now().to_rfc3339();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_refresh_tokens (id, user_id, token_hash, expires_at, created_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            token_id.into(),
            user_id.to_string().into(),
            hash_token(token).into(),
            expires_at.into(),
            created_at.into(),
        ],
    ))
    .await?;

    Ok(())
}

/// Returns the owner of a live (not expired, not revoked) token
pub async fn validate<C: ConnectionTrait>(conn: &C, token: &str) -> Result<String> {
    let now = Utc::now().to_rfc3339();

    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT user_id FROM sys_refresh_tokens
             WHERE token_hash = ? AND expires_at > ? AND revoked_at IS NULL",
            [hash_token(token).into(), now.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(row.try_get("", "user_id")?),
        None => Err(anyhow::anyhow!("Invalid or expired refresh token")),
    }
}

pub async fn revoke<C: ConnectionTrait>(conn: &C, token: &str) -> Result<()> {
    let revoked_at = Utc::now().to_rfc3339();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE token_hash = ? AND revoked_at IS NULL",
        [revoked_at.into(), hash_token(token).into()],
    ))
    .await?;

    Ok(())
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::open_in_memory;
    use contracts::system::users::RegisterDto;

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = hash_token("token");
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, hash_token("other"));
    }

    #[tokio::test]
    async fn test_store_validate_revoke() {
        let conn = open_in_memory().await;
        let user_id = crate::system::users::service::register(
            &conn,
            RegisterDto {
                username: "librarian".into(),
                email: "librarian@school.org".into(),
                password: "long enough".into(),
                confirm_password: "long enough".into(),
            },
        )
        .await
        .unwrap();

        let token = jwt::generate_refresh_token();
        store(&conn, &user_id, &token).await.unwrap();
        assert_eq!(validate(&conn, &token).await.unwrap(), user_id);

        revoke(&conn, &token).await.unwrap();
        assert!(validate(&conn, &token).await.is_err());
        assert!(validate(&conn, "never-issued").await.is_err());
    }
}
