//! Shared helpers for backend integration tests.
#![allow(dead_code, reason = "each test binary uses a different subset")]

pub mod recording;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::ServiceResponse;
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, Local, TimeZone, Utc};
use kontaktar_backend::Trace;
use kontaktar_backend::domain::ports::{
    SVIX_ID_HEADER, SVIX_SIGNATURE_HEADER, SVIX_TIMESTAMP_HEADER, UserRepository,
};
use kontaktar_backend::domain::{TRACE_ID_HEADER, UserDirectoryService, WebhookSyncService};
use kontaktar_backend::inbound::http::error::json_config;
use kontaktar_backend::inbound::http::state::HttpState;
use kontaktar_backend::inbound::http::users;
use kontaktar_backend::inbound::http::webhook::clerk_webhook;
use kontaktar_backend::outbound::svix::{SvixWebhookVerifier, WebhookSecret};
use mockable::Clock;
use serde_json::Value;

pub use recording::RecordingUserRepository;

/// Secret from the Svix documentation test vector.
pub const TEST_SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    pub utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// The instant every fixture clock reports.
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_now(),
    })
}

pub fn test_verifier() -> SvixWebhookVerifier {
    SvixWebhookVerifier::new(
        WebhookSecret::parse(TEST_SECRET).expect("test secret"),
        fixture_clock(),
    )
}

pub fn run_async<T>(future: impl Future<Output = T>) -> T {
    tokio::runtime::Runtime::new()
        .expect("runtime")
        .block_on(future)
}

/// HTTP state over `users` with the real Svix verifier.
pub fn http_state(users: Arc<dyn UserRepository>) -> web::Data<HttpState> {
    let webhook = WebhookSyncService::new(users.clone(), Arc::new(test_verifier()), fixture_clock())
        .with_store_timeout(Duration::from_secs(1));
    let directory = UserDirectoryService::new(users);
    web::Data::new(HttpState::new(Arc::new(webhook), Arc::new(directory)))
}

/// One signed delivery ready to send.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub id: String,
    pub timestamp: String,
    pub signature: String,
    pub body: String,
}

impl Delivery {
    /// Sign `payload` with the test secret at the fixture instant.
    pub fn signed(id: &str, payload: &Value) -> Self {
        let body = payload.to_string();
        let timestamp = fixture_now().timestamp().to_string();
        let signature = test_verifier()
            .sign(id, &timestamp, body.as_bytes())
            .expect("sign delivery");
        Self {
            id: id.to_owned(),
            timestamp,
            signature,
            body,
        }
    }

    pub fn request(&self) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/webhook/clerk")
            .insert_header((SVIX_ID_HEADER, self.id.as_str()))
            .insert_header((SVIX_TIMESTAMP_HEADER, self.timestamp.as_str()))
            .insert_header((SVIX_SIGNATURE_HEADER, self.signature.as_str()))
            .insert_header(("content-type", "application/json"))
            .set_payload(self.body.clone())
    }
}

/// Status, JSON body, and trace header of a response.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub status: u16,
    pub body: Value,
    pub trace_id: Option<String>,
}

async fn snapshot(response: ServiceResponse) -> Snapshot {
    let status = response.status().as_u16();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Snapshot {
        status,
        body,
        trace_id,
    }
}

/// Send requests in order through an app wired like the server.
pub async fn send_all(
    state: web::Data<HttpState>,
    requests: Vec<actix_test::TestRequest>,
) -> Vec<Snapshot> {
    let app = actix_test::init_service(
        App::new()
            .app_data(state)
            .app_data(json_config())
            .wrap(Trace)
            .service(clerk_webhook)
            .configure(users::configure),
    )
    .await;
    let mut snapshots = Vec::with_capacity(requests.len());
    for request in requests {
        let response = actix_test::call_service(&app, request.to_request()).await;
        snapshots.push(snapshot(response).await);
    }
    snapshots
}
