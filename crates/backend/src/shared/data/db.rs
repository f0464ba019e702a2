use anyhow::Context;
use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Tables created on start-up, in dependency order
const SCHEMA: &[(&str, &str)] = &[
    (
        "sys_users",
        r#"
        CREATE TABLE sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL,
            last_login_at TEXT
        );
        "#,
    ),
    (
        "sys_refresh_tokens",
        r#"
        CREATE TABLE sys_refresh_tokens (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL REFERENCES sys_users(id),
            token_hash TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            revoked_at TEXT
        );
        "#,
    ),
    (
        "sys_settings",
        r#"
        CREATE TABLE sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
    ),
    (
        "a001_student",
        r#"
        CREATE TABLE a001_student (
            student_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            firstname TEXT,
            lastname TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT
        );
        "#,
    ),
    (
        "a002_employee",
        r#"
        CREATE TABLE a002_employee (
            employee_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            date_of_joining TEXT NOT NULL,
            current_role TEXT NOT NULL,
            past_roles TEXT,
            skills TEXT NOT NULL DEFAULT '',
            experience REAL NOT NULL,
            educational_background TEXT NOT NULL DEFAULT '',
            skill_points INTEGER NOT NULL DEFAULT 0,
            achievement_badge TEXT
        );
        "#,
    ),
    (
        "a003_loan",
        r#"
        CREATE TABLE a003_loan (
            loan_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            device_id INTEGER NOT NULL,
            student_id INTEGER NOT NULL REFERENCES a001_student(student_id),
            borrowed_at TEXT NOT NULL,
            returned_at TEXT
        );
        "#,
    ),
    (
        "a004_assessment",
        r#"
        CREATE TABLE a004_assessment (
            assessment_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            employee_id INTEGER NOT NULL REFERENCES a002_employee(employee_id),
            technical INTEGER NOT NULL,
            communication INTEGER NOT NULL,
            teamwork INTEGER NOT NULL,
            comment TEXT,
            assessed_by TEXT NOT NULL,
            assessed_at TEXT NOT NULL
        );
        "#,
    ),
];

fn build_sqlite_url(path: &Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    let db_url = build_sqlite_url(&absolute_path);
    tracing::info!("Opening database: {}", db_url);

    let conn = Database::connect(&db_url).await?;
    ensure_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

/// Creates every missing table
pub async fn ensure_schema<C: ConnectionTrait>(conn: &C) -> anyhow::Result<()> {
    for (table, create_sql) in SCHEMA {
        let existing = conn
            .query_all(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' AND name = ?",
                [(*table).into()],
            ))
            .await?;

        if existing.is_empty() {
            tracing::info!("Creating {} table", table);
            conn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                create_sql.to_string(),
            ))
            .await
            .with_context(|| format!("Failed to create table {}", table))?;
        }
    }
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Fresh in-memory database with the full schema
#[cfg(test)]
pub async fn open_in_memory() -> DatabaseConnection {
    let conn = Database::connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    ensure_schema(&conn).await.expect("schema");
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sqlite_url() {
        assert_eq!(
            build_sqlite_url(Path::new("/var/lib/app.db")),
            "sqlite:///var/lib/app.db?mode=rwc"
        );
        assert_eq!(
            build_sqlite_url(Path::new("C:\\data\\app.db")),
            "sqlite:///C:/data/app.db?mode=rwc"
        );
    }

    #[tokio::test]
    async fn test_ensure_schema_is_repeatable() {
        let conn = open_in_memory().await;
        ensure_schema(&conn).await.unwrap();

        let tables = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'"
                    .to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(tables.len(), SCHEMA.len());
    }
}
