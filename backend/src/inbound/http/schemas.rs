//! OpenAPI schema wrappers for domain types.
//!
//! Domain types do not derive `ToSchema`; these mirrors carry the documented
//! wire shape and are registered under the domain type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Missing signature headers, failed verification, or invalid input.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Caller authentication is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Caller may not perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// Store failure, timeout, or missing configuration.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "Error verifying webhook")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "01234567-89ab-cdef-0123-456789abcdef")]
    trace_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Role)]
pub enum RoleSchema {
    #[schema(rename = "user")]
    User,
    #[schema(rename = "admin")]
    Admin,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Identity-provider user id.
    #[schema(example = "user_2NNEqL2nrIRdJ194ndJqAHwEfxC")]
    id: String,
    #[schema(example = "+354123")]
    phone_number: Option<String>,
    #[schema(example = "a@b.is")]
    email: Option<String>,
    #[schema(example = "bob")]
    username: Option<String>,
    #[schema(example = "Bob")]
    display_name: Option<String>,
    role: RoleSchema,
    #[schema(value_type = String, format = DateTime, example = "2025-03-14T09:26:53Z")]
    created_at: String,
}
