use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    auth::{jwt::AuthUser, repo::User},
    error::ApiError,
    state::AppState,
    uploads::validate::{classify, stored_filename},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_image))
        .route("/upload/resume", post(upload_resume))
        // Generous transport ceiling so oversized files reach the validator
        // and get the TooLarge answer instead of a blunt 413.
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
}

struct UploadedFile {
    name: String,
    content_type: String,
    body: Bytes,
}

/// Pull the expected file field out of the multipart body. Fields under any
/// other name are skipped, matching the original single-field contract.
async fn read_file_field(
    multipart: &mut Multipart,
    expected: &str,
) -> Result<UploadedFile, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(expected) {
            continue;
        }
        let name = match field.file_name() {
            Some(n) => n.to_string(),
            None => continue,
        };
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let body = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {e}")))?;
        return Ok(UploadedFile {
            name,
            content_type,
            body,
        });
    }
    warn!(field = expected, "multipart request without file field");
    Err(ApiError::Validation("No file uploaded".into()))
}

async fn validate_and_store(
    state: &AppState,
    file: UploadedFile,
) -> Result<UploadResponse, ApiError> {
    let kind = classify(&file.name, &file.content_type, file.body.len())
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let filename = stored_filename(&file.name);
    state.storage.save(&filename, file.body).await?;

    info!(%filename, ?kind, "file stored");
    Ok(UploadResponse {
        url: format!("/uploads/{filename}"),
        filename,
    })
}

#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let file = read_file_field(&mut multipart, "image").await?;
    let response = validate_and_store(&state, file).await?;
    Ok(Json(response))
}

/// Same pipeline as `upload_image`, but the stored path is also persisted as
/// the caller's résumé reference.
#[instrument(skip(state, multipart))]
pub async fn upload_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let file = read_file_field(&mut multipart, "resume").await?;
    let response = validate_and_store(&state, file).await?;

    User::set_resume_url(&state.db, user_id, &response.url)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "token for unknown user");
            ApiError::Unauthorized
        })?;

    info!(user_id = %user_id, url = %response.url, "resume uploaded");
    Ok(Json(response))
}
