// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod event;
pub mod job;
pub mod profile;
pub mod user;

pub use event::{Event, EventRegistration};
pub use job::{Job, JobApplication};
pub use profile::{IndividualProfile, StartupProfile};
pub use user::{User, UserType};
