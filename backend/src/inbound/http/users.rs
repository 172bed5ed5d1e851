//! Users API handlers.
//!
//! ```text
//! GET   /api/users/me
//! GET   /api/users/{id}
//! PATCH /api/users/{id}   {"display_name":"Bob"}
//! GET   /api/users
//! ```

use actix_web::{get, patch, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{DisplayName, Error, User, UserId, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;

/// Request body for `PATCH /api/users/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateDisplayNameRequest {
    #[schema(example = "Bob the Builder")]
    pub display_name: Option<String>,
}

fn map_user_validation_error(field: &'static str, err: UserValidationError) -> Error {
    let code = match err {
        UserValidationError::EmptyId | UserValidationError::EmptyDisplayName => "empty",
        UserValidationError::PaddedId => "padded",
        UserValidationError::IdTooLong { .. } | UserValidationError::DisplayNameTooLong { .. } => {
            "too_long"
        }
        UserValidationError::UnknownRole(_) => "unknown_role",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn parse_user_id(raw: String) -> ApiResult<UserId> {
    UserId::new(raw).map_err(|err| map_user_validation_error("id", err))
}

/// Register the `/api/users` routes.
///
/// `me` is registered before `{id}` so it is never captured as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .service(web::resource(["", "/"]).route(web::get().to(list_users)))
            .service(current_user)
            .service(get_user)
            .service(update_display_name),
    );
}

/// List all users. Requires administrator access, which no caller has yet.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 403, description = "Admin access required", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    state.users.list_users().await.map(web::Json)
}

/// The caller's own record. Requires authentication, which is not wired yet.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 401, description = "Authentication required", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(state: web::Data<HttpState>) -> ApiResult<web::Json<User>> {
    state.users.current_user().await.map(web::Json)
}

/// Fetch a user by identity-provider id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Identity-provider user id")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(path.into_inner())?;
    state.users.fetch_user(&id).await.map(web::Json)
}

/// Set a user's display name.
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Identity-provider user id")),
    request_body = UpdateDisplayNameRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Missing or invalid display name", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateDisplayName"
)]
#[patch("/{id}")]
pub async fn update_display_name(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateDisplayNameRequest>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(path.into_inner())?;
    let raw = payload.into_inner().display_name.ok_or_else(|| {
        Error::invalid_request("display_name is required")
            .with_details(json!({ "field": "display_name", "code": "missing" }))
    })?;
    let display_name =
        DisplayName::new(raw).map_err(|err| map_user_validation_error("display_name", err))?;
    state
        .users
        .update_display_name(&id, display_name)
        .await
        .map(web::Json)
}

#[cfg(test)]
mod tests;
