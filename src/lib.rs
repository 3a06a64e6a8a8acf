// SPDX-License-Identifier: MIT

//! SATAS: two-sided marketplace connecting startups with individual
//! job/event seekers.
//!
//! This crate provides the backend API: authenticated onboarding with role
//! selection, profile management, job postings and applications, event
//! postings and registrations, and file uploads to object storage.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod onboarding;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;
use services::{IdentityClient, StorageClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub identity: IdentityClient,
    pub storage: StorageClient,
}
