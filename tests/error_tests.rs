// SPDX-License-Identifier: MIT

//! AppError → HTTP status mapping tests.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use satas_api::error::AppError;

fn status_of(err: AppError) -> StatusCode {
    err.into_response().status()
}

#[test]
fn test_error_status_mapping() {
    assert_eq!(status_of(AppError::Unauthenticated), StatusCode::UNAUTHORIZED);
    assert_eq!(
        status_of(AppError::Forbidden("role mismatch".into())),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status_of(AppError::NotFound("job x".into())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_of(AppError::AlreadyExists("already applied".into())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_of(AppError::BadRequest("bad payload".into())),
        StatusCode::BAD_REQUEST
    );
}

#[test]
fn test_store_unavailable_is_500() {
    assert_eq!(
        status_of(AppError::Database("connection refused".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        status_of(AppError::Identity("provider down".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        status_of(AppError::Storage("bucket missing".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_sqlx_row_not_found_maps_to_not_found() {
    let err: AppError = sqlx::Error::RowNotFound.into();
    assert!(matches!(err, AppError::NotFound(_)));
}
