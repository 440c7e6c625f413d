//! User store implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::error::DbError;
use crate::models::{NewUser, Role, User};

/// Lookup interface consumed by the credential verifier.
///
/// Matching is exact: SQLite compares `TEXT` columns with the default
/// `BINARY` collation, so `find_user_by_email` is case-sensitive.
/// Implementations check a connection out per call and return it on every
/// exit path.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
}

/// Database connection and operations
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    pub async fn new(database_url: &str) -> Result<Self, DbError> {
        info!("Connecting to database: {}", database_url);

        let pool = SqlitePool::connect(database_url).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Get the underlying pool for advanced usage
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), DbError> {
        info!("Running database migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                full_name TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed");
        Ok(())
    }

    // ==================== User Operations ====================

    /// Insert a new user
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        // Check if the email is already registered
        let existing = self.find_user_by_email(&user.email).await?;
        if existing.is_some() {
            return Err(DbError::Duplicate(format!(
                "User '{}' already exists",
                user.email
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, full_name, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.role.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            role: user.role,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, full_name, role, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, full_name, role, created_at, updated_at
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Update user role
    pub async fn update_user_role(&self, id: i64, role: Role) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(role.as_str())
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update user password
    pub async fn update_user_password(&self, id: i64, password_hash: &str) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(password_hash)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check if any users exist
    pub async fn has_users(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}

#[async_trait]
impl UserStore for Database {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        // Checked out per lookup; the guard returns it to the pool on drop,
        // on the error path as well as the success path.
        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, full_name, role, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        let db = Database::new(&url).await.unwrap();
        (dir, db)
    }

    fn sample_user(email: &str, role: Role) -> NewUser {
        NewUser {
            username: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FtcGxlc2FtcGxl$QUJDREVGR0hJSktMTU5PUA".to_string(),
            full_name: "Sample User".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_by_email() {
        let (_dir, db) = test_db().await;

        let created = db
            .insert_user(sample_user("ana@example.com", Role::Administrador))
            .await
            .unwrap();

        let found = db
            .find_user_by_email("ana@example.com")
            .await
            .unwrap()
            .expect("user should exist");

        assert_eq!(found.id, created.id);
        assert_eq!(found.email, "ana@example.com");
        assert_eq!(found.role, Role::Administrador);

        let missing = db.find_user_by_email("nobody@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_sensitive() {
        let (_dir, db) = test_db().await;

        db.insert_user(sample_user("ana@example.com", Role::Attendee))
            .await
            .unwrap();

        let found = db.find_user_by_email("Ana@Example.com").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (_dir, db) = test_db().await;

        db.insert_user(sample_user("ana@example.com", Role::Organizer))
            .await
            .unwrap();

        let result = db
            .insert_user(sample_user("ana@example.com", Role::Attendee))
            .await;
        assert!(matches!(result, Err(DbError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_has_users_and_role_update() {
        let (_dir, db) = test_db().await;
        assert!(!db.has_users().await.unwrap());

        let user = db
            .insert_user(sample_user("org@example.com", Role::Organizer))
            .await
            .unwrap();
        assert!(db.has_users().await.unwrap());

        assert!(db.update_user_role(user.id, Role::Sysadmin).await.unwrap());
        let updated = db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(updated.role, Role::Sysadmin);

        assert!(db.delete_user(user.id).await.unwrap());
        assert!(!db.has_users().await.unwrap());
    }
}
