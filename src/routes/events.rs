// SPDX-License-Identifier: MIT

//! Event and registration routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Event, EventRegistration, UserType};
use crate::routes::require_role;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

const MAX_PER_PAGE: i64 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/{id}", get(get_event).delete(delete_event))
        .route("/api/events/{id}/registrations", get(list_registrations))
        .route("/api/events/{id}/register", post(register))
        .route("/api/events/{id}/unregister", post(unregister))
}

#[derive(Deserialize, Validate)]
pub struct CreateEventPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub description: String,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    #[validate(url)]
    pub banner_url: Option<String>,
}

/// Create an event (startup only).
async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<(StatusCode, Json<Event>)> {
    require_role(&state, &auth, UserType::Startup).await?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let event = Event {
        id: uuid::Uuid::new_v4().to_string(),
        startup_id: auth.user_id.clone(),
        title: payload.title,
        description: payload.description,
        location: payload.location,
        starts_at: payload.starts_at,
        banner_url: payload.banner_url,
        created_at: chrono::Utc::now(),
    };
    state.db.insert_event(&event).await?;

    tracing::info!(event_id = %event.id, startup_id = %auth.user_id, "Event created");

    let event = state
        .db
        .get_event(&event.id)
        .await?
        .ok_or_else(|| AppError::Database("Event row missing after insert".to_string()))?;

    Ok((StatusCode::CREATED, Json(event)))
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_per_page")]
    per_page: i64,
}

fn default_page() -> i64 {
    1
}
fn default_per_page() -> i64 {
    50
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
    pub page: i64,
    pub per_page: i64,
}

/// List events, soonest first.
async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<EventsResponse>> {
    if params.page < 1 {
        return Err(AppError::BadRequest("Page must be greater than 0".to_string()));
    }
    let per_page = params.per_page.clamp(1, MAX_PER_PAGE);
    let offset = (params.page - 1)
        .checked_mul(per_page)
        .ok_or_else(|| AppError::BadRequest("Page number causes overflow".to_string()))?;

    let events = state.db.list_events(per_page, offset).await?;

    Ok(Json(EventsResponse {
        events,
        page: params.page,
        per_page,
    }))
}

async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<Event>> {
    let event = state
        .db
        .get_event(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;
    Ok(Json(event))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Delete an event (owner only).
async fn delete_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(event_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    require_role(&state, &auth, UserType::Startup).await?;

    let event = state
        .db
        .get_event(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

    if event.startup_id != auth.user_id {
        return Err(AppError::Forbidden("not the owner of this event".to_string()));
    }

    if !state.db.delete_event(&event_id, &auth.user_id).await? {
        return Err(AppError::NotFound(format!("Event {} not found", event_id)));
    }

    tracing::info!(event_id = %event_id, startup_id = %auth.user_id, "Event deleted");

    Ok(Json(DeleteResponse { success: true }))
}

#[derive(Serialize)]
pub struct RegistrationsResponse {
    pub registrations: Vec<EventRegistration>,
}

/// List registrations for an event (owner only).
async fn list_registrations(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(event_id): Path<String>,
) -> Result<Json<RegistrationsResponse>> {
    require_role(&state, &auth, UserType::Startup).await?;

    let event = state
        .db
        .get_event(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

    if event.startup_id != auth.user_id {
        return Err(AppError::Forbidden("not the owner of this event".to_string()));
    }

    let registrations = state.db.list_registrations_for_event(&event_id).await?;
    Ok(Json(RegistrationsResponse { registrations }))
}

/// Register for an event (individual only). The UNIQUE constraint on
/// (event_id, registrant_id) rejects a second registration atomically.
async fn register(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(event_id): Path<String>,
) -> Result<(StatusCode, Json<EventRegistration>)> {
    require_role(&state, &auth, UserType::Individual).await?;

    let event = state
        .db
        .get_event(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

    let registration = EventRegistration {
        id: uuid::Uuid::new_v4().to_string(),
        event_id: event.id.clone(),
        registrant_id: auth.user_id.clone(),
        created_at: chrono::Utc::now(),
    };

    state
        .db
        .insert_registration(&registration)
        .await
        .map_err(|e| match e {
            AppError::AlreadyExists(_) => {
                AppError::AlreadyExists("already registered for this event".to_string())
            }
            other => other,
        })?;

    tracing::info!(event_id = %event.id, registrant_id = %auth.user_id, "Registration created");

    let registration = state
        .db
        .get_registration(&event.id, &auth.user_id)
        .await?
        .ok_or_else(|| AppError::Database("Registration row missing after insert".to_string()))?;

    Ok((StatusCode::CREATED, Json(registration)))
}

#[derive(Serialize)]
pub struct UnregisterResponse {
    pub success: bool,
}

/// Cancel a registration (individual only).
async fn unregister(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(event_id): Path<String>,
) -> Result<Json<UnregisterResponse>> {
    require_role(&state, &auth, UserType::Individual).await?;

    if !state
        .db
        .delete_registration(&event_id, &auth.user_id)
        .await?
    {
        return Err(AppError::NotFound("Registration not found".to_string()));
    }

    tracing::info!(event_id = %event_id, registrant_id = %auth.user_id, "Registration cancelled");

    Ok(Json(UnregisterResponse { success: true }))
}
