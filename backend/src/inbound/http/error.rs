//! Rendering of domain errors as HTTP responses.
//!
//! Every failure leaves as the JSON envelope `{code, message, traceId?,
//! details?}` with the trace id repeated in the `trace-id` header. Internal
//! failures keep only their code and trace id; store and configuration
//! messages stay in the logs.

use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, web};
use serde_json::json;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Handler result carrying a domain [`Error`].
pub type ApiResult<T> = Result<T, Error>;

/// Message that replaces every internal error sent to clients.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Copy of `error` that is safe to show a client.
fn client_view(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let generic = Error::internal(INTERNAL_ERROR_MESSAGE);
    match error.trace_id() {
        Some(id) => generic.with_trace_id(id),
        None => generic,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = client_view(self);
        let mut response = HttpResponse::build(self.status_code()).json(&body);
        if let Some(value) = body.trace_id().and_then(|id| HeaderValue::from_str(id).ok()) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        response
    }
}

/// Render JSON extractor failures with the standard error envelope.
///
/// # Examples
/// ```
/// use actix_web::{web, App};
/// use kontaktar_backend::inbound::http::error::json_error_handler;
///
/// let app = App::new().app_data(web::JsonConfig::default().error_handler(json_error_handler));
/// ```
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("Request body is not valid JSON for this endpoint")
        .with_details(json!({ "code": "invalid_json", "reason": err.to_string() }))
        .into()
}

/// JSON extractor configuration shared by every JSON endpoint.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}
