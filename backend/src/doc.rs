//! OpenAPI document for the REST surface.
//!
//! Schemas come from the wrappers in `inbound::http::schemas`, so domain
//! types stay free of utoipa derives. Served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::health::{HealthReport, ServiceInfo};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, RoleSchema, UserSchema};
use crate::inbound::http::users::UpdateDisplayNameRequest;
use crate::inbound::http::webhook::WebhookAck;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kontaktar backend API",
        description = "Identity-provider webhook synchronisation and user records."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::webhook::clerk_webhook,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_display_name,
        crate::inbound::http::health::info,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        RoleSchema,
        ErrorSchema,
        ErrorCodeSchema,
        UpdateDisplayNameRequest,
        WebhookAck,
        ServiceInfo,
        HealthReport
    )),
    tags(
        (name = "webhooks", description = "Signed identity-provider deliveries"),
        (name = "users", description = "Local user records"),
        (name = "health", description = "Service information and probes")
    )
)]
pub struct ApiDoc;
