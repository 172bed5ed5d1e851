//! Tests for users API handlers.

use super::*;
use crate::domain::ports::{MockUserDirectory, MockWebhookSyncCommand};
use crate::domain::{ContactDetails, ErrorCode};
use crate::inbound::http::error::json_config;
use actix_web::{App, http::StatusCode, test as actix_test};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::Value;
use std::sync::Arc;

#[fixture]
fn stored_user() -> User {
    let created_at = Utc
        .with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
        .single()
        .expect("valid fixture timestamp");
    User::register(
        UserId::new("user_1").expect("id"),
        ContactDetails::new(None, Some("a@b.is".to_owned()), Some("bob".to_owned())),
        created_at,
    )
}

async fn call(directory: MockUserDirectory, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let state = HttpState::new(
        Arc::new(MockWebhookSyncCommand::new()),
        Arc::new(directory),
    );
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .configure(configure),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

#[rstest]
#[actix_web::test]
async fn get_user_returns_record(stored_user: User) {
    let mut directory = MockUserDirectory::new();
    let expected = stored_user.clone();
    directory
        .expect_fetch_user()
        .withf(|id| id.as_ref() == "user_1")
        .times(1)
        .return_once(move |_| Ok(expected));

    let (status, body) = call(directory, actix_test::TestRequest::get().uri("/api/users/user_1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "user_1");
    assert_eq!(body["email"], "a@b.is");
    assert_eq!(body["role"], "user");
    assert_eq!(body["display_name"], Value::Null);
}

#[rstest]
#[actix_web::test]
async fn get_user_maps_not_found() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_fetch_user()
        .return_once(|id| Err(Error::not_found(format!("User {id} not found"))));

    let (status, body) = call(directory, actix_test::TestRequest::get().uri("/api/users/ghost")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], "User ghost not found");
}

#[rstest]
#[actix_web::test]
async fn get_user_rejects_padded_id_before_lookup() {
    let mut directory = MockUserDirectory::new();
    directory.expect_fetch_user().never();

    let (status, body) =
        call(directory, actix_test::TestRequest::get().uri("/api/users/%20user_1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "id");
    assert_eq!(body["details"]["code"], "padded");
}

#[rstest]
#[actix_web::test]
async fn me_is_not_captured_as_an_id() {
    let mut directory = MockUserDirectory::new();
    directory.expect_fetch_user().never();
    directory
        .expect_current_user()
        .times(1)
        .return_once(|| Err(Error::unauthorized("Authentication required")));

    let (status, body) = call(directory, actix_test::TestRequest::get().uri("/api/users/me")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[case("/api/users")]
#[case("/api/users/")]
#[actix_web::test]
async fn listing_requires_admin(#[case] uri: &str) {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_list_users()
        .times(1)
        .return_once(|| Err(Error::forbidden("Admin access required")));

    let (status, body) = call(directory, actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin access required");
}

#[rstest]
#[actix_web::test]
async fn patch_sets_display_name(stored_user: User) {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_update_display_name()
        .withf(|id, name| id.as_ref() == "user_1" && name.as_ref() == "Bob the Builder")
        .times(1)
        .return_once(move |_, name| {
            let mut user = stored_user;
            user.apply(&crate::domain::UserPatch::display_name(name));
            Ok(user)
        });

    let request = actix_test::TestRequest::patch()
        .uri("/api/users/user_1")
        .set_json(serde_json::json!({ "display_name": "Bob the Builder" }));
    let (status, body) = call(directory, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "Bob the Builder");
    assert_eq!(body["email"], "a@b.is");
}

#[rstest]
#[case(serde_json::json!({}), "missing")]
#[case(serde_json::json!({ "display_name": null }), "missing")]
#[case(serde_json::json!({ "display_name": "   " }), "empty")]
#[case(serde_json::json!({ "display_name": "x".repeat(101) }), "too_long")]
#[actix_web::test]
async fn patch_validates_display_name(#[case] payload: Value, #[case] code: &str) {
    let mut directory = MockUserDirectory::new();
    directory.expect_update_display_name().never();

    let request = actix_test::TestRequest::patch()
        .uri("/api/users/user_1")
        .set_json(payload);
    let (status, body) = call(directory, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "display_name");
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn patch_rejects_non_json_body() {
    let mut directory = MockUserDirectory::new();
    directory.expect_update_display_name().never();

    let request = actix_test::TestRequest::patch()
        .uri("/api/users/user_1")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json");
    let (status, body) = call(directory, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_json");
}

#[rstest]
fn validation_errors_carry_field_and_code() {
    let err = map_user_validation_error("id", UserValidationError::EmptyId);
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "user id must not be empty");
    assert_eq!(
        err.details(),
        Some(&serde_json::json!({ "field": "id", "code": "empty" }))
    );
}
