// SPDX-License-Identifier: MIT

//! Job posting and application routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Job, JobApplication, UserType};
use crate::routes::require_role;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

const MAX_PER_PAGE: i64 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/jobs", get(list_jobs).post(create_job))
        .route("/api/jobs/{id}", get(get_job).delete(delete_job))
        .route("/api/jobs/{id}/applications", get(list_applications))
        .route("/api/jobs/{id}/apply", post(apply))
}

#[derive(Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub description: String,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 100))]
    pub employment_type: Option<String>,
    #[validate(length(max = 100))]
    pub salary_range: Option<String>,
}

/// Create a job posting (startup only).
async fn create_job(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<(StatusCode, Json<Job>)> {
    require_role(&state, &auth, UserType::Startup).await?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let now = chrono::Utc::now();
    let job = Job {
        id: uuid::Uuid::new_v4().to_string(),
        startup_id: auth.user_id.clone(),
        title: payload.title,
        description: payload.description,
        location: payload.location,
        employment_type: payload.employment_type,
        salary_range: payload.salary_range,
        created_at: now,
        updated_at: now,
    };
    state.db.insert_job(&job).await?;

    tracing::info!(job_id = %job.id, startup_id = %auth.user_id, "Job created");

    let job = state
        .db
        .get_job(&job.id)
        .await?
        .ok_or_else(|| AppError::Database("Job row missing after insert".to_string()))?;

    Ok((StatusCode::CREATED, Json(job)))
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
pub struct JobsResponse {
    pub jobs: Vec<Job>,
    pub page: i64,
    pub per_page: i64,
}

/// List job postings, newest first.
async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<JobsResponse>> {
    if params.page < 1 {
        return Err(AppError::BadRequest("Page must be greater than 0".to_string()));
    }
    let per_page = params.per_page.clamp(1, MAX_PER_PAGE);
    let offset = (params.page - 1)
        .checked_mul(per_page)
        .ok_or_else(|| AppError::BadRequest("Page number causes overflow".to_string()))?;

    let jobs = state.db.list_jobs(per_page, offset).await?;

    Ok(Json(JobsResponse {
        jobs,
        page: params.page,
        per_page,
    }))
}

async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>> {
    let job = state
        .db
        .get_job(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;
    Ok(Json(job))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Delete a job posting (owner only).
async fn delete_job(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    require_role(&state, &auth, UserType::Startup).await?;

    let job = state
        .db
        .get_job(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    if job.startup_id != auth.user_id {
        return Err(AppError::Forbidden("not the owner of this job".to_string()));
    }

    if !state.db.delete_job(&job_id, &auth.user_id).await? {
        return Err(AppError::NotFound(format!("Job {} not found", job_id)));
    }

    tracing::info!(job_id = %job_id, startup_id = %auth.user_id, "Job deleted");

    Ok(Json(DeleteResponse { success: true }))
}

#[derive(Serialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<JobApplication>,
}

/// List applications for a job (owner only).
async fn list_applications(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<String>,
) -> Result<Json<ApplicationsResponse>> {
    require_role(&state, &auth, UserType::Startup).await?;

    let job = state
        .db
        .get_job(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    if job.startup_id != auth.user_id {
        return Err(AppError::Forbidden("not the owner of this job".to_string()));
    }

    let applications = state.db.list_applications_for_job(&job_id).await?;
    Ok(Json(ApplicationsResponse { applications }))
}

#[derive(Deserialize, Default, Validate)]
pub struct ApplyPayload {
    #[validate(length(max = 5000))]
    pub cover_letter: Option<String>,
}

/// Apply to a job (individual only). The UNIQUE constraint on
/// (job_id, applicant_id) rejects a second application atomically.
async fn apply(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<JobApplication>)> {
    require_role(&state, &auth, UserType::Individual).await?;

    // The cover letter body is optional
    let payload: ApplyPayload = if body.is_empty() {
        ApplyPayload::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("invalid body: {}", e)))?
    };
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let job = state
        .db
        .get_job(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    let application = JobApplication {
        id: uuid::Uuid::new_v4().to_string(),
        job_id: job.id.clone(),
        applicant_id: auth.user_id.clone(),
        status: "pending".to_string(),
        cover_letter: payload.cover_letter,
        created_at: chrono::Utc::now(),
    };

    state
        .db
        .insert_application(&application)
        .await
        .map_err(|e| match e {
            AppError::AlreadyExists(_) => {
                AppError::AlreadyExists("already applied to this job".to_string())
            }
            other => other,
        })?;

    tracing::info!(job_id = %job.id, applicant_id = %auth.user_id, "Application submitted");

    let application = state
        .db
        .get_application(&job.id, &auth.user_id)
        .await?
        .ok_or_else(|| AppError::Database("Application row missing after insert".to_string()))?;

    Ok((StatusCode::CREATED, Json(application)))
}
