// SPDX-License-Identifier: MIT

//! Job posting and application models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Job posting owned by a startup.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: String,
    pub startup_id: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join row: one application per (job, applicant) pair, enforced by a
/// unique constraint on the table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobApplication {
    pub id: String,
    pub job_id: String,
    pub applicant_id: String,
    pub status: String,
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
}
