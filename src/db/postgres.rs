// SPDX-License-Identifier: MIT

//! Postgres client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (identity mirror rows)
//! - Individual / startup profiles (one row per user at most)
//! - Jobs and applications
//! - Events and registrations
//!
//! The (job, applicant) and (event, registrant) pairs carry UNIQUE
//! constraints; duplicate inserts surface as unique violations and are
//! translated to `AppError::AlreadyExists` by the `From<sqlx::Error>` impl.

use crate::error::AppError;
use crate::models::{
    Event, EventRegistration, IndividualProfile, Job, JobApplication, StartupProfile, User,
    UserType,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const MAX_CONNECTIONS: u32 = 5;

/// Postgres database client.
#[derive(Clone)]
pub struct Database {
    pool: Option<PgPool>,
}

impl Database {
    /// Connect to Postgres and run pending migrations.
    pub async fn new(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Postgres: {}", e)))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;

        tracing::info!("Connected to Postgres");

        Ok(Self { pool: Some(pool) })
    }

    /// Create a mock database client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { pool: None }
    }

    /// Helper to get the pool or return an error if offline.
    fn get_pool(&self) -> Result<&PgPool, AppError> {
        self.pool
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by their identity provider ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.get_pool()?)
            .await?;
        Ok(user)
    }

    /// Create or refresh a user row on sign-in.
    ///
    /// A locally assigned `user_type` wins over the value carried in the
    /// provider session metadata, so a re-login cannot clear the role.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, user_type, created_at, last_sign_in_at)
            VALUES ($1, $2, $3, $4, now(), now())
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                name = COALESCE(EXCLUDED.name, users.name),
                user_type = COALESCE(users.user_type, EXCLUDED.user_type),
                last_sign_in_at = now()
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.user_type)
        .execute(self.get_pool()?)
        .await?;
        Ok(())
    }

    /// Set a user's role.
    pub async fn set_user_type(&self, user_id: &str, user_type: UserType) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET user_type = $1 WHERE id = $2")
            .bind(user_type)
            .bind(user_id)
            .execute(self.get_pool()?)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Check whether the profile row matching `user_type` exists.
    ///
    /// This is the single lookup the onboarding resolver depends on.
    pub async fn has_profile(&self, user_id: &str, user_type: UserType) -> Result<bool, AppError> {
        let query = match user_type {
            UserType::Individual => {
                "SELECT EXISTS (SELECT 1 FROM individual_profiles WHERE user_id = $1)"
            }
            UserType::Startup => {
                "SELECT EXISTS (SELECT 1 FROM startup_profiles WHERE user_id = $1)"
            }
        };

        let exists: bool = sqlx::query_scalar(query)
            .bind(user_id)
            .fetch_one(self.get_pool()?)
            .await?;
        Ok(exists)
    }

    pub async fn get_individual_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<IndividualProfile>, AppError> {
        let profile = sqlx::query_as::<_, IndividualProfile>(
            "SELECT * FROM individual_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.get_pool()?)
        .await?;
        Ok(profile)
    }

    /// Insert an individual profile. Fails with `AlreadyExists` if the user
    /// already has one (primary key conflict).
    pub async fn insert_individual_profile(
        &self,
        profile: &IndividualProfile,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO individual_profiles
                (user_id, first_name, last_name, phone, location, bio, skills,
                 avatar_url, cv_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now(), now())
            "#,
        )
        .bind(&profile.user_id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(&profile.location)
        .bind(&profile.bio)
        .bind(&profile.skills)
        .bind(&profile.avatar_url)
        .bind(&profile.cv_url)
        .execute(self.get_pool()?)
        .await?;
        Ok(())
    }

    pub async fn update_individual_profile(
        &self,
        profile: &IndividualProfile,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE individual_profiles
            SET first_name = $2, last_name = $3, phone = $4, location = $5,
                bio = $6, skills = $7, avatar_url = $8, cv_url = $9,
                updated_at = now()
            WHERE user_id = $1
            "#,
        )
        .bind(&profile.user_id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(&profile.location)
        .bind(&profile.bio)
        .bind(&profile.skills)
        .bind(&profile.avatar_url)
        .bind(&profile.cv_url)
        .execute(self.get_pool()?)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Individual profile not found".to_string()));
        }
        Ok(())
    }

    pub async fn get_startup_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<StartupProfile>, AppError> {
        let profile = sqlx::query_as::<_, StartupProfile>(
            "SELECT * FROM startup_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.get_pool()?)
        .await?;
        Ok(profile)
    }

    /// Insert a startup profile. Fails with `AlreadyExists` if the user
    /// already has one (primary key conflict).
    pub async fn insert_startup_profile(&self, profile: &StartupProfile) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO startup_profiles
                (user_id, name, description, team_size, founded_year, website,
                 logo_url, banner_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), now())
            "#,
        )
        .bind(&profile.user_id)
        .bind(&profile.name)
        .bind(&profile.description)
        .bind(profile.team_size)
        .bind(profile.founded_year)
        .bind(&profile.website)
        .bind(&profile.logo_url)
        .bind(&profile.banner_url)
        .execute(self.get_pool()?)
        .await?;
        Ok(())
    }

    pub async fn update_startup_profile(&self, profile: &StartupProfile) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE startup_profiles
            SET name = $2, description = $3, team_size = $4, founded_year = $5,
                website = $6, logo_url = $7, banner_url = $8, updated_at = now()
            WHERE user_id = $1
            "#,
        )
        .bind(&profile.user_id)
        .bind(&profile.name)
        .bind(&profile.description)
        .bind(profile.team_size)
        .bind(profile.founded_year)
        .bind(&profile.website)
        .bind(&profile.logo_url)
        .bind(&profile.banner_url)
        .execute(self.get_pool()?)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Startup profile not found".to_string()));
        }
        Ok(())
    }

    // ─── Job Operations ──────────────────────────────────────────

    pub async fn insert_job(&self, job: &Job) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO jobs
                (id, startup_id, title, description, location, employment_type,
                 salary_range, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())
            "#,
        )
        .bind(&job.id)
        .bind(&job.startup_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.location)
        .bind(&job.employment_type)
        .bind(&job.salary_range)
        .execute(self.get_pool()?)
        .await?;
        Ok(())
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(self.get_pool()?)
            .await?;
        Ok(job)
    }

    pub async fn list_jobs(&self, limit: i64, offset: i64) -> Result<Vec<Job>, AppError> {
        let jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.get_pool()?)
        .await?;
        Ok(jobs)
    }

    /// Delete a job owned by `startup_id`. Returns false if no matching row.
    pub async fn delete_job(&self, job_id: &str, startup_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND startup_id = $2")
            .bind(job_id)
            .bind(startup_id)
            .execute(self.get_pool()?)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert a job application; the UNIQUE (job_id, applicant_id)
    /// constraint rejects duplicates atomically.
    pub async fn insert_application(&self, application: &JobApplication) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO job_applications
                (id, job_id, applicant_id, status, cover_letter, created_at)
            VALUES ($1, $2, $3, $4, $5, now())
            "#,
        )
        .bind(&application.id)
        .bind(&application.job_id)
        .bind(&application.applicant_id)
        .bind(&application.status)
        .bind(&application.cover_letter)
        .execute(self.get_pool()?)
        .await?;
        Ok(())
    }

    pub async fn get_application(
        &self,
        job_id: &str,
        applicant_id: &str,
    ) -> Result<Option<JobApplication>, AppError> {
        let application = sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications WHERE job_id = $1 AND applicant_id = $2",
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_optional(self.get_pool()?)
        .await?;
        Ok(application)
    }

    pub async fn list_applications_for_job(
        &self,
        job_id: &str,
    ) -> Result<Vec<JobApplication>, AppError> {
        let applications = sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications WHERE job_id = $1 ORDER BY created_at DESC",
        )
        .bind(job_id)
        .fetch_all(self.get_pool()?)
        .await?;
        Ok(applications)
    }

    // ─── Event Operations ────────────────────────────────────────

    pub async fn insert_event(&self, event: &Event) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO events
                (id, startup_id, title, description, location, starts_at,
                 banner_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now())
            "#,
        )
        .bind(&event.id)
        .bind(&event.startup_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.starts_at)
        .bind(&event.banner_url)
        .execute(self.get_pool()?)
        .await?;
        Ok(())
    }

    pub async fn get_event(&self, event_id: &str) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(event_id)
            .fetch_optional(self.get_pool()?)
            .await?;
        Ok(event)
    }

    pub async fn list_events(&self, limit: i64, offset: i64) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events ORDER BY starts_at, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.get_pool()?)
        .await?;
        Ok(events)
    }

    /// Delete an event owned by `startup_id`. Returns false if no matching row.
    pub async fn delete_event(&self, event_id: &str, startup_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND startup_id = $2")
            .bind(event_id)
            .bind(startup_id)
            .execute(self.get_pool()?)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert an event registration; the UNIQUE (event_id, registrant_id)
    /// constraint rejects duplicates atomically.
    pub async fn insert_registration(
        &self,
        registration: &EventRegistration,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO event_registrations (id, event_id, registrant_id, created_at)
            VALUES ($1, $2, $3, now())
            "#,
        )
        .bind(&registration.id)
        .bind(&registration.event_id)
        .bind(&registration.registrant_id)
        .execute(self.get_pool()?)
        .await?;
        Ok(())
    }

    pub async fn get_registration(
        &self,
        event_id: &str,
        registrant_id: &str,
    ) -> Result<Option<EventRegistration>, AppError> {
        let registration = sqlx::query_as::<_, EventRegistration>(
            "SELECT * FROM event_registrations WHERE event_id = $1 AND registrant_id = $2",
        )
        .bind(event_id)
        .bind(registrant_id)
        .fetch_optional(self.get_pool()?)
        .await?;
        Ok(registration)
    }

    /// Remove a registration. Returns false if the user was not registered.
    pub async fn delete_registration(
        &self,
        event_id: &str,
        registrant_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM event_registrations WHERE event_id = $1 AND registrant_id = $2",
        )
        .bind(event_id)
        .bind(registrant_id)
        .execute(self.get_pool()?)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_registrations_for_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<EventRegistration>, AppError> {
        let registrations = sqlx::query_as::<_, EventRegistration>(
            "SELECT * FROM event_registrations WHERE event_id = $1 ORDER BY created_at",
        )
        .bind(event_id)
        .fetch_all(self.get_pool()?)
        .await?;
        Ok(registrations)
    }
}
