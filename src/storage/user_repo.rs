use crate::domain::user::User;
use crate::error::{AppError, Result};
use crate::storage::DbPool;
use crate::storage::records::user::UserRecord;

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(User::from))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(User::from))
    }

    /// Case-sensitive prefix match, ordered by insertion (id).
    pub async fn find_by_username_prefix(&self, prefix: &str) -> Result<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(
            r"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username LIKE $1 || '%'
            ORDER BY id
            ",
        )
        .bind(escape_like(prefix))
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(User::from).collect())
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn create(&self, username: &str, password_hash: &str) -> Result<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            r"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            ",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(record.into())
    }

    /// Full replace of username and password hash. Returns `None` when no row
    /// matched the id.
    pub async fn update(&self, id: i64, username: &str, password_hash: &str) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r"
            UPDATE users
            SET username = $2, password_hash = $3
            WHERE id = $1
            RETURNING id, username, password_hash, created_at
            ",
        )
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(record.map(User::from))
    }

    /// Deleting an absent id affects zero rows; that is not a repository error.
    pub async fn delete_by_id(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected())
    }
}

/// A unique-index violation means two writers raced past the application-level
/// availability check; the index is the final arbiter.
fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Username already exists".to_string())
        }
        _ => AppError::Database(e),
    }
}

/// Escapes `LIKE` metacharacters so the prefix is matched literally.
fn escape_like(prefix: &str) -> String {
    prefix.replace('\\', r"\\").replace('%', r"\%").replace('_', r"\_")
}
