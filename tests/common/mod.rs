// SPDX-License-Identifier: MIT

use satas_api::config::Config;
use satas_api::db::Database;
use satas_api::routes::create_router;
use satas_api::services::{IdentityClient, StorageClient};
use satas_api::AppState;
use std::sync::Arc;

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn database_available() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

/// Skip test with message if no test database is available.
#[macro_export]
macro_rules! require_database {
    () => {
        if !crate::common::database_available() {
            eprintln!("⚠️  Skipping: DATABASE_URL not set");
            return;
        }
    };
}

/// Create a test database connection (runs migrations).
#[allow(dead_code)]
pub async fn test_db() -> Database {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");
    Database::new(&url)
        .await
        .expect("Failed to connect to test database")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> Database {
    Database::new_mock()
}

/// Create a test app around the given database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(db: Database) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let identity = IdentityClient::new(
        &config.identity_url,
        &config.identity_client_id,
        &config.identity_client_secret,
    );
    let storage = StorageClient::new(&config.storage_url, &config.storage_service_key);

    let state = Arc::new(AppState {
        config,
        db,
        identity,
        storage,
    });

    (create_router(state.clone()), state)
}

/// Create a test JWT token for `user_id`.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        email: String,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: format!("{}@example.com", user_id),
        exp: now + 86400,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}
