use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record. The hash never leaves the process: it is skipped on
/// serialization and stripped again by `PublicUser` at the boundary.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub resume_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, username, email, password_hash, resume_url, created_at";

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Single combined existence check backing the registration conflict rule.
    pub async fn exists_by_username_or_email(
        db: &PgPool,
        username: &str,
        email: &str,
    ) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    pub async fn set_resume_url(
        db: &PgPool,
        id: Uuid,
        resume_url: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET resume_url = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(resume_url)
        .fetch_optional(db)
        .await
    }

    /// Résumé of the portfolio owner: the first-created user record. The site
    /// has exactly one real account, so "first" is the owner.
    pub async fn owner_resume_url(db: &PgPool) -> sqlx::Result<Option<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT resume_url FROM users ORDER BY created_at ASC LIMIT 1",
        )
        .fetch_optional(db)
        .await
    }
}
