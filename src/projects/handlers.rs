use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    projects::{
        dto::{DeleteResponse, ProjectPayload},
        repo::Project,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects))
        .route("/projects/:id", get(get_project))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", post(create_project))
        .route("/projects/:id", put(update_project))
        .route("/projects/:id", delete(delete_project))
}

#[instrument(skip(state))]
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = Project::list(&state.db).await?;
    Ok(Json(projects))
}

#[instrument(skip(state))]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, ApiError> {
    let project = Project::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".into()))?;
    Ok(Json(project))
}

#[instrument(skip(state, payload))]
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProjectPayload>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    payload.validate()?;
    let project = Project::create(&state.db, &payload).await?;
    info!(project_id = %project.id, user_id = %user_id, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

#[instrument(skip(state, payload))]
pub async fn update_project(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectPayload>,
) -> Result<Json<Project>, ApiError> {
    payload.validate()?;
    let project = Project::update(&state.db, id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".into()))?;
    info!(project_id = %id, user_id = %user_id, "project updated");
    Ok(Json(project))
}

#[instrument(skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !Project::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Project not found".into()));
    }
    info!(project_id = %id, user_id = %user_id, "project deleted");
    Ok(Json(DeleteResponse {
        message: "Project deleted successfully".into(),
    }))
}
