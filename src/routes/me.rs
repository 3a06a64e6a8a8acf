// SPDX-License-Identifier: MIT

//! Current-user routes: profile status, role assignment.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{User, UserType};
use crate::onboarding::{self, Destination, Session};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/me/user-type", post(set_user_type))
        .route("/api/onboarding/status", get(onboarding_status))
}

/// Current user response.
#[derive(Serialize)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub user_type: Option<UserType>,
    pub destination: Destination,
}

/// Get current user with their resolved onboarding destination.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let user = state
        .db
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", auth.user_id)))?;

    let destination = onboarding::resolve(
        &state.db,
        &Session {
            user_id: user.id.clone(),
            user_type: user.user_type,
        },
    )
    .await?;

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        user_type: user.user_type,
        destination,
    }))
}

/// Onboarding status response.
#[derive(Serialize)]
pub struct OnboardingStatusResponse {
    pub destination: Destination,
}

/// Poll the onboarding destination for the current session.
async fn onboarding_status(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<OnboardingStatusResponse>> {
    let user = state
        .db
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", auth.user_id)))?;

    let destination = onboarding::resolve(
        &state.db,
        &Session {
            user_id: user.id,
            user_type: user.user_type,
        },
    )
    .await?;

    Ok(Json(OnboardingStatusResponse { destination }))
}

#[derive(Deserialize)]
pub struct SetUserTypeRequest {
    pub user_type: UserType,
}

#[derive(Serialize)]
pub struct SetUserTypeResponse {
    pub user_type: UserType,
}

/// Assign the caller's role.
///
/// Overwriting is allowed until a profile row of the current type exists;
/// after that the role is immutable.
async fn set_user_type(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<SetUserTypeRequest>,
) -> Result<Json<SetUserTypeResponse>> {
    match state.db.get_user(&auth.user_id).await? {
        Some(user) => {
            if let Some(current) = user.user_type {
                if current != payload.user_type
                    && state.db.has_profile(&user.id, current).await?
                {
                    return Err(AppError::BadRequest(
                        "user type cannot be changed after profile creation".to_string(),
                    ));
                }
            }
            state
                .db
                .set_user_type(&auth.user_id, payload.user_type)
                .await?;
        }
        // First type-assignment call can arrive before the first /auth/callback
        // mirror write; create the row.
        None => {
            let now = chrono::Utc::now();
            state
                .db
                .upsert_user(&User {
                    id: auth.user_id.clone(),
                    email: auth.email.clone(),
                    name: None,
                    user_type: Some(payload.user_type),
                    created_at: now,
                    last_sign_in_at: now,
                })
                .await?;
        }
    }

    // Mirror the role into provider session metadata. The local row is
    // authoritative for onboarding; a failed mirror only delays the
    // provider-side copy.
    if let Err(e) = state
        .identity
        .set_user_type_metadata(&auth.user_id, payload.user_type)
        .await
    {
        tracing::warn!(
            user_id = %auth.user_id,
            error = %e,
            "Failed to mirror user type to identity provider"
        );
    }

    tracing::info!(
        user_id = %auth.user_id,
        user_type = payload.user_type.as_str(),
        "User type assigned"
    );

    Ok(Json(SetUserTypeResponse {
        user_type: payload.user_type,
    }))
}
