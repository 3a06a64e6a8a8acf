// SPDX-License-Identifier: MIT

//! File upload passthrough to object storage.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::UserType;
use crate::routes::require_role;
use crate::services::storage::buckets;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/uploads/{kind}", post(upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// What is being uploaded; determines the bucket and the required role.
#[derive(Debug, Clone, Copy)]
enum UploadKind {
    Avatar,
    Cv,
    Logo,
    Banner,
}

impl UploadKind {
    fn parse(kind: &str) -> Result<Self> {
        match kind {
            "avatar" => Ok(UploadKind::Avatar),
            "cv" => Ok(UploadKind::Cv),
            "logo" => Ok(UploadKind::Logo),
            "banner" => Ok(UploadKind::Banner),
            other => Err(AppError::BadRequest(format!(
                "unknown upload kind: {other}"
            ))),
        }
    }

    fn bucket(&self) -> &'static str {
        match self {
            UploadKind::Avatar => buckets::AVATARS,
            UploadKind::Cv => buckets::CVS,
            UploadKind::Logo => buckets::LOGOS,
            UploadKind::Banner => buckets::BANNERS,
        }
    }

    fn required_role(&self) -> UserType {
        match self {
            UploadKind::Avatar | UploadKind::Cv => UserType::Individual,
            UploadKind::Logo | UploadKind::Banner => UserType::Startup,
        }
    }
}

/// File extension guessed from the content type subtype.
fn extension_for(content_type: &str) -> &str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/svg+xml" => "svg",
        other => other.rsplit('/').next().unwrap_or("bin"),
    }
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Upload a file and respond with its public URL.
async fn upload(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let kind = UploadKind::parse(&kind)?;
    require_role(&state, &auth, kind.required_role()).await?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Content-Type header required".to_string()))?
        .to_string();

    if body.is_empty() {
        return Err(AppError::BadRequest("empty upload body".to_string()));
    }

    let path = format!(
        "{}/{}.{}",
        auth.user_id,
        uuid::Uuid::new_v4(),
        extension_for(&content_type)
    );

    let url = state
        .storage
        .upload(kind.bucket(), &path, body.to_vec(), &content_type)
        .await?;

    tracing::info!(
        user_id = %auth.user_id,
        bucket = kind.bucket(),
        size = body.len(),
        "File uploaded"
    );

    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_kind_role_mapping() {
        assert_eq!(
            UploadKind::parse("avatar").unwrap().required_role(),
            UserType::Individual
        );
        assert_eq!(
            UploadKind::parse("cv").unwrap().required_role(),
            UserType::Individual
        );
        assert_eq!(
            UploadKind::parse("logo").unwrap().required_role(),
            UserType::Startup
        );
        assert_eq!(
            UploadKind::parse("banner").unwrap().required_role(),
            UserType::Startup
        );
        assert!(UploadKind::parse("resume").is_err());
    }

    #[test]
    fn test_extension_for_content_type() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("application/pdf"), "pdf");
        assert_eq!(extension_for("image/svg+xml"), "svg");
    }
}
