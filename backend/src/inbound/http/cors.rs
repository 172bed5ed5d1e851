//! Cross-origin policy for browser clients (admin dashboard, customer app).
//!
//! Credentials are always allowed, so the wildcard `*` is never sent: with no
//! configured origins the request's own `Origin` is reflected.

use actix_cors::Cors;
use actix_web::http::header::HeaderValue;

use crate::domain::TRACE_ID_HEADER;

const MAX_AGE_SECS: usize = 3600;

/// A configured origin that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("CORS origin `{value}` must be an http(s) origin such as https://app.example")]
pub struct InvalidOrigin {
    pub value: String,
}

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AllowedOrigins {
    /// Reflect whatever origin the browser sends.
    #[default]
    Any,
    /// Only these exact origins.
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Parse a comma-separated origin list. Unset, blank, or `*` allow any.
    ///
    /// # Errors
    /// Returns [`InvalidOrigin`] for an entry that is not an `http://` or
    /// `https://` origin or is not a valid header value.
    ///
    /// # Examples
    /// ```
    /// use kontaktar_backend::inbound::http::cors::AllowedOrigins;
    ///
    /// assert_eq!(AllowedOrigins::parse(None), Ok(AllowedOrigins::Any));
    /// assert_eq!(
    ///     AllowedOrigins::parse(Some("https://admin.kontaktar.is")),
    ///     Ok(AllowedOrigins::List(vec!["https://admin.kontaktar.is".to_owned()]))
    /// );
    /// ```
    pub fn parse(raw: Option<&str>) -> Result<Self, InvalidOrigin> {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty() && *raw != "*") else {
            return Ok(Self::Any);
        };
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
                if scheme_ok && HeaderValue::from_str(origin).is_ok() {
                    Ok(origin.trim_end_matches('/').to_owned())
                } else {
                    Err(InvalidOrigin {
                        value: origin.to_owned(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::List)
    }
}

/// Build the CORS middleware for `origins`.
#[must_use]
pub fn cors(origins: &AllowedOrigins) -> Cors {
    let base = match origins {
        AllowedOrigins::Any => Cors::default().allow_any_origin(),
        AllowedOrigins::List(list) => list
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin)),
    };
    base.allowed_methods(["GET", "POST", "PATCH", "OPTIONS"])
        .allow_any_header()
        .expose_headers([TRACE_ID_HEADER])
        .supports_credentials()
        .max_age(MAX_AGE_SECS)
}
