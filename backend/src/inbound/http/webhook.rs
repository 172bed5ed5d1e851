//! Identity-provider webhook endpoint.
//!
//! ```text
//! POST /api/webhook/clerk
//! svix-id: msg_...
//! svix-timestamp: 1614265330
//! svix-signature: v1,<base64>
//! ```
//!
//! The body is taken as raw bytes; the signature covers them exactly as
//! received, so it must not pass through a JSON extractor first.

use actix_web::{HttpRequest, post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ports::{
    SVIX_ID_HEADER, SVIX_SIGNATURE_HEADER, SVIX_TIMESTAMP_HEADER, SignedEnvelope, WebhookOutcome,
};
use crate::domain::{Error, WebhookSyncError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Acknowledgement body.
///
/// Applied and retained events answer `{"success":true}`; ignored event
/// types answer `{"received":true}`.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WebhookAck {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<bool>,
}

impl From<&WebhookOutcome> for WebhookAck {
    fn from(outcome: &WebhookOutcome) -> Self {
        match outcome {
            WebhookOutcome::Processed { .. } | WebhookOutcome::Retained { .. } => Self {
                success: Some(true),
                received: None,
            },
            WebhookOutcome::Ignored { .. } => Self {
                success: None,
                received: Some(true),
            },
        }
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

/// Receive a signed user lifecycle event.
#[utoipa::path(
    post,
    path = "/api/webhook/clerk",
    request_body(content = String, content_type = "application/json", description = "Signed event"),
    params(
        ("svix-id" = String, Header, description = "Delivery id"),
        ("svix-timestamp" = String, Header, description = "Unix seconds at signing"),
        ("svix-signature" = String, Header, description = "Space-separated `v1,<base64>` entries")
    ),
    responses(
        (status = 200, description = "Accepted", body = WebhookAck),
        (status = 400, description = "Missing headers, bad signature, or malformed payload", body = ErrorSchema),
        (status = 500, description = "Store failure or missing secret", body = ErrorSchema)
    ),
    tags = ["webhooks"],
    operation_id = "clerkWebhook"
)]
#[post("/api/webhook/clerk")]
pub async fn clerk_webhook(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<WebhookAck>> {
    let envelope = SignedEnvelope::from_headers(
        header(&req, SVIX_ID_HEADER),
        header(&req, SVIX_TIMESTAMP_HEADER),
        header(&req, SVIX_SIGNATURE_HEADER),
    )
    .map_err(|missing| {
        warn!(missing = ?missing.missing(), "webhook rejected: signature headers absent");
        Error::from(WebhookSyncError::from(missing))
    })?;

    let outcome = state.webhook.synchronise(&envelope, &body).await?;
    Ok(web::Json(WebhookAck::from(&outcome)))
}
