use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, PublicUser, RegisterRequest, ResumeResponse,
            UpdateResumeRequest,
        },
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/resume", get(public_resume))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile/resume", put(update_resume))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if payload.username.is_empty() {
        return Err(ApiError::Validation("Username is required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }

    if User::exists_by_username_or_email(&state.db, &payload.username, &payload.email).await? {
        warn!(username = %payload.username, "username or email already registered");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.username, &payload.email, &hash).await?;

    let token = JwtKeys::from_ref(&state).issue(user.id)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password answer identically: no enumeration
    // signal leaves this handler.
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(&state).issue(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "token for unknown user");
        ApiError::Unauthorized
    })?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateResumeRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::set_resume_url(&state.db, user_id, &payload.resume_url)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "token for unknown user");
            ApiError::Unauthorized
        })?;
    info!(user_id = %user_id, "resume url updated");
    Ok(Json(user.into()))
}

/// Public résumé lookup for the owner account; 404 until one is set.
#[instrument(skip(state))]
pub async fn public_resume(
    State(state): State<AppState>,
) -> Result<Json<ResumeResponse>, ApiError> {
    match User::owner_resume_url(&state.db).await? {
        Some(url) if !url.is_empty() => Ok(Json(ResumeResponse { resume_url: url })),
        _ => Err(ApiError::NotFound("Resume not found".into())),
    }
}
