// SPDX-License-Identifier: MIT

//! Object storage client.
//!
//! Uploads raw bytes to a bucket path and returns the public URL.

use crate::error::AppError;

/// Bucket names.
pub mod buckets {
    pub const AVATARS: &str = "avatars";
    pub const CVS: &str = "cvs";
    pub const LOGOS: &str = "logos";
    pub const BANNERS: &str = "banners";
}

/// Object storage API client.
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl StorageClient {
    pub fn new(base_url: &str, service_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    /// Upload bytes to `bucket/path` and return the public URL.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let url = format!("{}/object/{}/{}", self.base_url, bucket, path);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type.to_string())
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!("HTTP {}: {}", status, body)));
        }

        Ok(self.public_url(bucket, path))
    }

    /// Public URL for an uploaded object.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, bucket, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url() {
        let client = StorageClient::new("http://localhost:9998/", "key");
        assert_eq!(
            client.public_url(buckets::AVATARS, "user-1/abc.png"),
            "http://localhost:9998/object/public/avatars/user-1/abc.png"
        );
    }
}
