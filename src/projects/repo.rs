use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::projects::dto::ProjectPayload;

/// Project record. Publicly readable; id and timestamps are server-assigned
/// and survive every update untouched except `updated_at`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub skills_learned: Vec<String>,
    pub image_url: String,
    pub project_url: String,
    pub github_url: String,
    pub featured: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const PROJECT_COLUMNS: &str = "id, title, summary, description, technologies, skills_learned, \
     image_url, project_url, github_url, featured, created_at, updated_at";

impl Project {
    /// All projects, newest creation first. No pagination.
    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Project>> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Project>> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(db: &PgPool, fields: &ProjectPayload) -> sqlx::Result<Project> {
        sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects \
                 (title, summary, description, technologies, skills_learned, \
                  image_url, project_url, github_url, featured) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(&fields.title)
        .bind(&fields.summary)
        .bind(&fields.description)
        .bind(&fields.technologies)
        .bind(&fields.skills_learned)
        .bind(&fields.image_url)
        .bind(&fields.project_url)
        .bind(&fields.github_url)
        .bind(fields.featured)
        .fetch_one(db)
        .await
    }

    /// Full-field replace; `updated_at` is refreshed server-side.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        fields: &ProjectPayload,
    ) -> sqlx::Result<Option<Project>> {
        sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects SET \
                 title = $2, summary = $3, description = $4, technologies = $5, \
                 skills_learned = $6, image_url = $7, project_url = $8, \
                 github_url = $9, featured = $10, updated_at = now() \
             WHERE id = $1 \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.summary)
        .bind(&fields.description)
        .bind(&fields.technologies)
        .bind(&fields.skills_learned)
        .bind(&fields.image_url)
        .bind(&fields.project_url)
        .bind(&fields.github_url)
        .bind(fields.featured)
        .fetch_optional(db)
        .await
    }

    /// Returns false when the id was already gone.
    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
