// SPDX-License-Identifier: MIT

//! Event and registration models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event hosted by a startup.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: String,
    pub startup_id: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub banner_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Join row: one registration per (event, registrant) pair, enforced by a
/// unique constraint on the table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRegistration {
    pub id: String,
    pub event_id: String,
    pub registrant_id: String,
    pub created_at: DateTime<Utc>,
}
