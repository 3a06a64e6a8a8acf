// SPDX-License-Identifier: MIT

//! Role-specific profile models. A user has at most one profile row of the
//! type matching their `user_type`; its presence marks onboarding complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Extended profile for an individual job/event seeker.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IndividualProfile {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub avatar_url: Option<String>,
    pub cv_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Extended profile for a startup.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StartupProfile {
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub team_size: i32,
    pub founded_year: i32,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
