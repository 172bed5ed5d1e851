//! Behaviour coverage for the `/api/users` endpoints over the in-memory store.

use std::sync::Arc;

use actix_web::test as actix_test;
use kontaktar_backend::domain::{ContactDetails, User, UserId};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;

mod support;

use support::{Delivery, RecordingUserRepository, Snapshot, fixture_now, http_state, run_async};

const NEW_DISPLAY_NAME: &str = "Bob the Builder";

struct World {
    store: RecordingUserRepository,
    setup: Vec<actix_test::TestRequest>,
    response: Option<Snapshot>,
}

#[fixture]
fn world() -> World {
    World {
        store: RecordingUserRepository::new(),
        setup: Vec::new(),
        response: None,
    }
}

fn send(world: &mut World, request: actix_test::TestRequest) {
    let mut requests = std::mem::take(&mut world.setup);
    let setup_count = requests.len();
    requests.push(request);
    let state = http_state(Arc::new(world.store.clone()));
    let responses = run_async(support::send_all(state, requests));
    for setup in &responses[..setup_count] {
        assert_eq!(setup.status, 200, "setup request failed: {}", setup.body);
    }
    world.response = responses.last().cloned();
}

fn response(world: &World) -> &Snapshot {
    world.response.as_ref().expect("a response")
}

#[given("user u1 is stored")]
fn user_u1_is_stored(world: &mut World) {
    let user = User::register(
        UserId::new("u1").expect("id"),
        ContactDetails::new(
            Some("+354123".to_owned()),
            Some("a@b.is".to_owned()),
            Some("bob".to_owned()),
        ),
        fixture_now(),
    );
    run_async(world.store.seed(&user));
}

#[given("no users are stored")]
fn no_users_are_stored(world: &mut World) {
    assert_eq!(world.store.stored_count(), 0);
}

#[given("u1 was created through a signed webhook")]
fn u1_was_created_through_a_signed_webhook(world: &mut World) {
    let payload = json!({
        "type": "user.created",
        "data": {
            "id": "u1",
            "phone_numbers": [{ "phone_number": "+354123" }],
            "email_addresses": [{ "email_address": "a@b.is" }],
            "username": "bob",
        }
    });
    world
        .setup
        .push(Delivery::signed("msg_setup_u1", &payload).request());
}

#[when("the client fetches u1")]
fn the_client_fetches_u1(world: &mut World) {
    send(world, actix_test::TestRequest::get().uri("/api/users/u1"));
}

#[when("the client sets the display name of u1")]
fn the_client_sets_the_display_name_of_u1(world: &mut World) {
    send(
        world,
        actix_test::TestRequest::patch()
            .uri("/api/users/u1")
            .set_json(json!({ "display_name": NEW_DISPLAY_NAME })),
    );
}

#[when("the client patches u1 without a display name")]
fn the_client_patches_u1_without_a_display_name(world: &mut World) {
    send(
        world,
        actix_test::TestRequest::patch()
            .uri("/api/users/u1")
            .set_json(json!({ "nickname": NEW_DISPLAY_NAME })),
    );
}

#[when("the client lists users")]
fn the_client_lists_users(world: &mut World) {
    send(world, actix_test::TestRequest::get().uri("/api/users"));
}

#[when("the client asks for the current user")]
fn the_client_asks_for_the_current_user(world: &mut World) {
    send(world, actix_test::TestRequest::get().uri("/api/users/me"));
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &mut World, status: u16) {
    let response = response(world);
    assert_eq!(response.status, status, "body: {}", response.body);
    assert!(response.trace_id.is_some(), "trace-id header expected");
}

#[then("the error code is {code}")]
fn the_error_code_is(world: &mut World, code: String) {
    assert_eq!(response(world).body["code"], code.as_str());
}

#[then("the body describes u1 with role user")]
fn the_body_describes_u1_with_role_user(world: &mut World) {
    let body = &response(world).body;
    assert_eq!(body["id"], "u1");
    assert_eq!(body["phone_number"], "+354123");
    assert_eq!(body["email"], "a@b.is");
    assert_eq!(body["username"], "bob");
    assert_eq!(body["role"], "user");
    assert!(body["created_at"].is_string());
}

#[then("u1 has the new display name in the store")]
fn u1_has_the_new_display_name_in_the_store(world: &mut World) {
    assert_eq!(response(world).body["display_name"], NEW_DISPLAY_NAME);
    let user = run_async(world.store.peek("u1")).expect("u1 stored");
    assert_eq!(
        user.display_name().map(AsRef::as_ref),
        Some(NEW_DISPLAY_NAME)
    );
}

#[then("u1 still has no display name in the store")]
fn u1_still_has_no_display_name_in_the_store(world: &mut World) {
    let user = run_async(world.store.peek("u1")).expect("u1 stored");
    assert!(user.display_name().is_none());
}

#[scenario(
    path = "tests/features/users_api.feature",
    name = "Fetching a stored user returns the record"
)]
fn fetching_a_stored_user_returns_the_record(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_api.feature",
    name = "Fetching an unknown user is not found"
)]
fn fetching_an_unknown_user_is_not_found(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_api.feature",
    name = "A user synchronised by webhook is readable"
)]
fn user_synchronised_by_webhook_is_readable(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_api.feature",
    name = "Setting a display name persists it"
)]
fn setting_a_display_name_persists_it(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_api.feature",
    name = "A patch without a display name is rejected"
)]
fn patch_without_a_display_name_is_rejected(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_api.feature",
    name = "Renaming an unknown user is not found"
)]
fn renaming_an_unknown_user_is_not_found(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_api.feature",
    name = "Listing users requires an administrator"
)]
fn listing_users_requires_an_administrator(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_api.feature",
    name = "The current user requires authentication"
)]
fn current_user_requires_authentication(world: World) {
    drop(world);
}
