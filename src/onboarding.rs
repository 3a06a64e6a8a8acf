// SPDX-License-Identifier: MIT

//! Onboarding resolver.
//!
//! Decides, from a user's role and the presence of their role-specific
//! profile row, which screen they should land on next. Every entry point
//! that needs this answer (the OAuth callback redirect, the onboarding
//! status endpoint, `/api/me`) goes through [`resolve`], so the decision
//! can never drift between call sites.

use crate::db::Database;
use crate::error::Result;
use crate::models::UserType;
use serde::Serialize;

/// Authenticated session state the resolver operates on.
///
/// An absent session never reaches the resolver; the auth middleware
/// rejects it with 401 first.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub user_type: Option<UserType>,
}

/// Where the user should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    /// No role picked yet
    SelectUserType,
    /// Role picked, profile row missing
    CreateIndividualProfile,
    CreateStartupProfile,
    /// Onboarding complete
    EnterApplication,
}

impl Destination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::SelectUserType => "select-user-type",
            Destination::CreateIndividualProfile => "create-individual-profile",
            Destination::CreateStartupProfile => "create-startup-profile",
            Destination::EnterApplication => "enter-application",
        }
    }

    /// Frontend path the OAuth callback redirects to.
    pub fn frontend_path(&self) -> &'static str {
        match self {
            Destination::SelectUserType => "/onboarding/select-type",
            Destination::CreateIndividualProfile => "/onboarding/individual",
            Destination::CreateStartupProfile => "/onboarding/startup",
            Destination::EnterApplication => "/app",
        }
    }
}

/// Pure decision function.
///
/// `has_profile` is the presence of the profile row in the table matching
/// `user_type`; it is ignored while no role is picked.
pub fn destination(user_type: Option<UserType>, has_profile: bool) -> Destination {
    match (user_type, has_profile) {
        (None, _) => Destination::SelectUserType,
        (Some(UserType::Individual), false) => Destination::CreateIndividualProfile,
        (Some(UserType::Startup), false) => Destination::CreateStartupProfile,
        (Some(_), true) => Destination::EnterApplication,
    }
}

/// Resolve the destination for a session, performing the single profile
/// lookup. A store failure propagates as `AppError::Database` and is never
/// conflated with "no profile".
pub async fn resolve(db: &Database, session: &Session) -> Result<Destination> {
    let has_profile = match session.user_type {
        // No role yet, so there is no authoritative profile table to check.
        None => false,
        Some(user_type) => db.has_profile(&session.user_id, user_type).await?,
    };

    Ok(destination(session.user_type, has_profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_user_type_needs_selection() {
        assert_eq!(destination(None, false), Destination::SelectUserType);
        // Profile presence is irrelevant without a role
        assert_eq!(destination(None, true), Destination::SelectUserType);
    }

    #[test]
    fn test_type_without_profile_needs_creation() {
        assert_eq!(
            destination(Some(UserType::Individual), false),
            Destination::CreateIndividualProfile
        );
        assert_eq!(
            destination(Some(UserType::Startup), false),
            Destination::CreateStartupProfile
        );
    }

    #[test]
    fn test_type_with_profile_is_ready() {
        assert_eq!(
            destination(Some(UserType::Individual), true),
            Destination::EnterApplication
        );
        assert_eq!(
            destination(Some(UserType::Startup), true),
            Destination::EnterApplication
        );
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(Destination::SelectUserType.as_str(), "select-user-type");
        assert_eq!(
            Destination::CreateIndividualProfile.as_str(),
            "create-individual-profile"
        );
        assert_eq!(
            Destination::CreateStartupProfile.as_str(),
            "create-startup-profile"
        );
        assert_eq!(Destination::EnterApplication.as_str(), "enter-application");
    }

    #[test]
    fn test_frontend_paths() {
        assert_eq!(
            Destination::SelectUserType.frontend_path(),
            "/onboarding/select-type"
        );
        assert_eq!(Destination::EnterApplication.frontend_path(), "/app");
    }
}
