// SPDX-License-Identifier: MIT

//! Identity provider client.
//!
//! Handles:
//! - OAuth authorization-code exchange
//! - Fetching the authenticated user (`{id, email, metadata}`)
//! - Pushing the selected `user_type` into session metadata

use crate::error::AppError;
use crate::models::UserType;
use serde::Deserialize;

/// Identity provider API client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl IdentityClient {
    /// Create a new client with OAuth credentials.
    pub fn new(base_url: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        }
    }

    /// Build the provider authorization URL for the login redirect.
    pub fn authorize_url(&self, callback_url: &str, state: &str) -> String {
        format!(
            "{}/oauth/authorize?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope=openid%20email%20profile&\
             state={}",
            self.base_url,
            self.client_id,
            urlencoding::encode(callback_url),
            state
        )
    }

    /// Exchange an authorization code for the signed-in user.
    pub async fn exchange_code(
        &self,
        code: &str,
        callback_url: &str,
    ) -> Result<ProviderUser, AppError> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", callback_url),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("Code exchange request failed: {}", e)))?;

        let token: TokenResponse = self.check_response_json(response).await?;

        self.get_user(&token.access_token).await
    }

    /// Fetch the current session's user.
    pub async fn get_user(&self, access_token: &str) -> Result<ProviderUser, AppError> {
        let response = self
            .http
            .get(format!("{}/oauth/userinfo", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Identity(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Store the selected role in the user's session metadata.
    pub async fn set_user_type_metadata(
        &self,
        user_id: &str,
        user_type: UserType,
    ) -> Result<(), AppError> {
        let body = serde_json::json!({
            "user_metadata": { "user_type": user_type.as_str() }
        });

        let response = self
            .http
            .put(format!("{}/admin/users/{}", self.base_url, user_id))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("Metadata update failed: {}", e)))?;

        self.check_response(response).await
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Identity(format!("HTTP {}: {}", status, body)))
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Identity(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Identity(format!("JSON parse error: {}", e)))
    }
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// User record as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    #[serde(alias = "sub")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Free-form session metadata; `user_type` is the only key we read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub user_type: Option<UserType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_encodes_redirect() {
        let client = IdentityClient::new("http://localhost:9999/", "cid", "secret");
        let url = client.authorize_url("http://localhost:8080/auth/callback", "abc123");

        assert!(url.starts_with("http://localhost:9999/oauth/authorize?"));
        assert!(url.contains("client_id=cid"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fcallback"));
        assert!(url.contains("state=abc123"));
    }

    #[test]
    fn test_provider_user_parses_metadata() {
        let json = r#"{
            "sub": "user-1",
            "email": "a@example.com",
            "user_metadata": { "user_type": "startup", "other": 1 }
        }"#;

        let user: ProviderUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.user_metadata.user_type, Some(UserType::Startup));
    }

    #[test]
    fn test_provider_user_without_metadata() {
        let json = r#"{ "id": "user-2", "email": "b@example.com" }"#;

        let user: ProviderUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "user-2");
        assert_eq!(user.user_metadata.user_type, None);
    }
}
