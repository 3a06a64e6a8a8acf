// SPDX-License-Identifier: MIT

//! Services module - external collaborator clients.

pub mod identity;
pub mod storage;

pub use identity::{IdentityClient, ProviderUser};
pub use storage::StorageClient;
