// SPDX-License-Identifier: MIT

//! Listing pagination parameter tests.
//!
//! Out-of-range page numbers must be rejected with 400 before any store
//! query runs, so these tests use the offline mock database: a request
//! that reached the store would fail with 500 instead.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn get_with_token(app: &axum::Router, uri: &str, token: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_huge_page_number_is_rejected() {
    let (app, state) = common::create_test_app(common::test_db_offline());
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);

    // (page - 1) * per_page would overflow i64; must be a 400, not a panic
    let (status, body) = get_with_token(
        &app,
        "/api/jobs?page=9223372036854775807&per_page=100",
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, body) = get_with_token(
        &app,
        "/api/events?page=9223372036854775807&per_page=100",
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_zero_and_negative_pages_are_rejected() {
    let (app, state) = common::create_test_app(common::test_db_offline());
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);

    for uri in ["/api/jobs?page=0", "/api/jobs?page=-1", "/api/events?page=0"] {
        let (status, body) = get_with_token(&app, uri, &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }
}
