//! Tests for identity event decoding and contact extraction.

use super::*;
use rstest::rstest;
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

fn phone(value: Option<&str>) -> PhoneNumberEntry {
    PhoneNumberEntry {
        phone_number: value.map(str::to_owned),
    }
}

#[rstest]
#[case(None, None)]
#[case(Some(vec![]), None)]
#[case(Some(vec![phone(None), phone(Some("+354999"))]), None)]
#[case(Some(vec![phone(Some("+354123")), phone(Some("+354999"))]), Some("+354123"))]
fn first_or_absent_only_consults_the_first_entry(
    #[case] entries: Option<Vec<PhoneNumberEntry>>,
    #[case] expected: Option<&str>,
) {
    let value = first_or_absent(entries.as_deref(), |entry| entry.phone_number.as_deref());
    assert_eq!(value.as_deref(), expected);
}

#[given("a user.created body for u1")]
fn a_user_created_body_for_u1() -> Vec<u8> {
    json!({
        "type": "user.created",
        "data": {
            "id": "u1",
            "phone_numbers": [{ "phone_number": "+354123" }],
            "email_addresses": [{ "email_address": "a@b.is" }],
            "username": "bob"
        }
    })
    .to_string()
    .into_bytes()
}

#[when("the body is decoded")]
fn the_body_is_decoded(body: Vec<u8>) -> Result<IdentityEvent, EventDecodeError> {
    IdentityEvent::decode(&body)
}

#[then("a created event carries the first contact entries")]
fn a_created_event_carries_the_first_contact_entries(
    event: Result<IdentityEvent, EventDecodeError>,
) {
    let user = match event {
        Ok(IdentityEvent::Created(user)) => user,
        other => panic!("expected created event, got {other:?}"),
    };
    assert_eq!(user.id().as_ref(), "u1");
    assert_eq!(user.contact().phone_number(), Some("+354123"));
    assert_eq!(user.contact().email(), Some("a@b.is"));
    assert_eq!(user.contact().username(), Some("bob"));
}

#[rstest]
fn decodes_user_created() {
    let body = a_user_created_body_for_u1();
    let event = the_body_is_decoded(body);
    a_created_event_carries_the_first_contact_entries(event);
}

#[rstest]
fn empty_lists_and_username_decode_as_absent() {
    let body = json!({
        "type": "user.updated",
        "data": { "id": "u1", "phone_numbers": [], "email_addresses": [], "username": "" }
    })
    .to_string();
    let event = IdentityEvent::decode(body.as_bytes()).expect("decodes");
    let IdentityEvent::Updated(user) = event else {
        panic!("expected updated event");
    };
    assert_eq!(user.contact(), &ContactDetails::default());
}

#[rstest]
fn missing_lists_decode_as_absent() {
    let body = br#"{"type":"user.created","data":{"id":"u1"}}"#;
    let event = IdentityEvent::decode(body).expect("decodes");
    assert_eq!(
        event,
        IdentityEvent::Created(ProviderUser::new(
            UserId::new("u1").expect("id"),
            ContactDetails::default()
        ))
    );
}

#[rstest]
fn decodes_deleted_with_id() {
    let body = br#"{"type":"user.deleted","data":{"id":"u1","deleted":true}}"#;
    let event = IdentityEvent::decode(body).expect("decodes");
    assert_eq!(event.event_type(), USER_DELETED);
    assert_eq!(event.user_id().map(AsRef::as_ref), Some("u1"));
}

#[rstest]
#[case(br#"{"type":"user.deleted","data":{"deleted":true}}"#.as_slice())]
#[case(br#"{"type":"user.deleted","data":{"id":null}}"#.as_slice())]
#[case(br#"{"type":"user.deleted","data":{"id":""}}"#.as_slice())]
#[case(br#"{"type":"user.deleted","data":"gone"}"#.as_slice())]
#[case(br#"{"type":"user.deleted"}"#.as_slice())]
fn deleted_without_a_usable_id_still_decodes(#[case] body: &[u8]) {
    let event = IdentityEvent::decode(body).expect("deletions always decode");
    assert_eq!(event, IdentityEvent::Deleted { id: None });
    assert_eq!(event.event_type(), USER_DELETED);
    assert!(event.user_id().is_none());
}

#[rstest]
#[case(br#"{"type":"org.created","data":{"id":"org_1"}}"#.as_slice(), "org.created")]
#[case(br#"{"type":"session.ended"}"#.as_slice(), "session.ended")]
fn unknown_types_ignore_data(#[case] body: &[u8], #[case] expected: &str) {
    let event = IdentityEvent::decode(body).expect("decodes");
    assert_eq!(event, IdentityEvent::Unknown(expected.to_owned()));
    assert!(event.user_id().is_none());
}

#[rstest]
#[case(b"not json".as_slice())]
#[case(br#"[1,2,3]"#.as_slice())]
#[case(br#"{"data":{"id":"u1"}}"#.as_slice())]
#[case(br#"{"type":7}"#.as_slice())]
fn rejects_bodies_without_a_type(#[case] body: &[u8]) {
    assert!(matches!(
        IdentityEvent::decode(body),
        Err(EventDecodeError::Envelope { .. })
    ));
}

#[rstest]
#[case(br#"{"type":"user.created","data":{}}"#.as_slice())]
#[case(br#"{"type":"user.updated"}"#.as_slice())]
#[case(br#"{"type":"user.updated","data":{"id":null}}"#.as_slice())]
fn rejects_user_events_without_an_id(#[case] body: &[u8]) {
    assert!(matches!(
        IdentityEvent::decode(body),
        Err(EventDecodeError::Payload { .. })
    ));
}

#[rstest]
fn rejects_blank_user_ids() {
    let body = br#"{"type":"user.created","data":{"id":""}}"#;
    assert!(matches!(
        IdentityEvent::decode(body),
        Err(EventDecodeError::UserId {
            source: UserValidationError::EmptyId,
            ..
        })
    ));
}
