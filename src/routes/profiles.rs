// SPDX-License-Identifier: MIT

//! Role-specific profile CRUD.
//!
//! Creating the profile row is what completes onboarding, so POST requires
//! the caller's role to match the profile type.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{IndividualProfile, StartupProfile, UserType};
use crate::routes::require_role;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/profiles/individual",
            get(get_individual)
                .post(create_individual)
                .put(update_individual),
        )
        .route(
            "/api/profiles/startup",
            get(get_startup).post(create_startup).put(update_startup),
        )
}

fn validate<T: Validate>(payload: &T) -> Result<()> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

// ─── Individual ──────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct IndividualProfilePayload {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(length(max = 2000))]
    pub skills: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
    #[validate(url)]
    pub cv_url: Option<String>,
}

async fn get_individual(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<IndividualProfile>> {
    let profile = state
        .db
        .get_individual_profile(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Individual profile not found".to_string()))?;
    Ok(Json(profile))
}

async fn create_individual(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<IndividualProfilePayload>,
) -> Result<(StatusCode, Json<IndividualProfile>)> {
    require_role(&state, &auth, UserType::Individual).await?;
    validate(&payload)?;

    let now = chrono::Utc::now();
    state
        .db
        .insert_individual_profile(&IndividualProfile {
            user_id: auth.user_id.clone(),
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone: payload.phone,
            location: payload.location,
            bio: payload.bio,
            skills: payload.skills,
            avatar_url: payload.avatar_url,
            cv_url: payload.cv_url,
            created_at: now,
            updated_at: now,
        })
        .await
        .map_err(|e| match e {
            AppError::AlreadyExists(_) => {
                AppError::AlreadyExists("individual profile already exists".to_string())
            }
            other => other,
        })?;

    tracing::info!(user_id = %auth.user_id, "Individual profile created");

    let profile = state
        .db
        .get_individual_profile(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::Database("Profile row missing after insert".to_string()))?;

    Ok((StatusCode::CREATED, Json(profile)))
}

async fn update_individual(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<IndividualProfilePayload>,
) -> Result<Json<IndividualProfile>> {
    require_role(&state, &auth, UserType::Individual).await?;
    validate(&payload)?;

    let now = chrono::Utc::now();
    state
        .db
        .update_individual_profile(&IndividualProfile {
            user_id: auth.user_id.clone(),
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone: payload.phone,
            location: payload.location,
            bio: payload.bio,
            skills: payload.skills,
            avatar_url: payload.avatar_url,
            cv_url: payload.cv_url,
            created_at: now,
            updated_at: now,
        })
        .await?;

    let profile = state
        .db
        .get_individual_profile(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::Database("Profile row missing after update".to_string()))?;

    Ok(Json(profile))
}

// ─── Startup ─────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct StartupProfilePayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    #[validate(range(min = 1, max = 1_000_000))]
    pub team_size: i32,
    #[validate(range(min = 1800, max = 2100))]
    pub founded_year: i32,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    #[validate(url)]
    pub banner_url: Option<String>,
}

async fn get_startup(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<StartupProfile>> {
    let profile = state
        .db
        .get_startup_profile(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Startup profile not found".to_string()))?;
    Ok(Json(profile))
}

async fn create_startup(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<StartupProfilePayload>,
) -> Result<(StatusCode, Json<StartupProfile>)> {
    require_role(&state, &auth, UserType::Startup).await?;
    validate(&payload)?;

    let now = chrono::Utc::now();
    state
        .db
        .insert_startup_profile(&StartupProfile {
            user_id: auth.user_id.clone(),
            name: payload.name,
            description: payload.description,
            team_size: payload.team_size,
            founded_year: payload.founded_year,
            website: payload.website,
            logo_url: payload.logo_url,
            banner_url: payload.banner_url,
            created_at: now,
            updated_at: now,
        })
        .await
        .map_err(|e| match e {
            AppError::AlreadyExists(_) => {
                AppError::AlreadyExists("startup profile already exists".to_string())
            }
            other => other,
        })?;

    tracing::info!(user_id = %auth.user_id, "Startup profile created");

    let profile = state
        .db
        .get_startup_profile(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::Database("Profile row missing after insert".to_string()))?;

    Ok((StatusCode::CREATED, Json(profile)))
}

async fn update_startup(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<StartupProfilePayload>,
) -> Result<Json<StartupProfile>> {
    require_role(&state, &auth, UserType::Startup).await?;
    validate(&payload)?;

    let now = chrono::Utc::now();
    state
        .db
        .update_startup_profile(&StartupProfile {
            user_id: auth.user_id.clone(),
            name: payload.name,
            description: payload.description,
            team_size: payload.team_size,
            founded_year: payload.founded_year,
            website: payload.website,
            logo_url: payload.logo_url,
            banner_url: payload.banner_url,
            created_at: now,
            updated_at: now,
        })
        .await?;

    let profile = state
        .db
        .get_startup_profile(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::Database("Profile row missing after update".to_string()))?;

    Ok(Json(profile))
}
