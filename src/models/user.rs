//! User identity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role a user selects during onboarding.
///
/// Stored as the `user_type` Postgres enum; also mirrored into the identity
/// provider's session metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
pub enum UserType {
    Individual,
    Startup,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Individual => "individual",
            UserType::Startup => "startup",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(UserType::Individual),
            "startup" => Ok(UserType::Startup),
            other => Err(format!("unknown user type: {other}")),
        }
    }
}

/// User record mirroring the identity provider.
///
/// Created or refreshed on every completed sign-in. `user_type` is None
/// until the user picks a role.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Opaque identifier issued by the identity provider
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub user_type: Option<UserType>,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: DateTime<Utc>,
}
