//! Port for authenticating signed webhook deliveries.
//!
//! The identity provider signs each delivery with a message id, a Unix
//! timestamp, and one or more signatures. Inbound adapters lift those headers
//! into a [`SignedEnvelope`]; verifier adapters check them against the raw
//! body bytes exactly as received.

use super::define_port_error;

/// Header carrying the provider's message identifier.
pub const SVIX_ID_HEADER: &str = "svix-id";
/// Header carrying the signing time in Unix seconds.
pub const SVIX_TIMESTAMP_HEADER: &str = "svix-timestamp";
/// Header carrying space-separated `version,signature` entries.
pub const SVIX_SIGNATURE_HEADER: &str = "svix-signature";

define_port_error! {
    /// Reasons a delivery failed authentication.
    pub enum VerificationError {
        /// No signing secret is configured; deliveries cannot be trusted.
        SecretNotConfigured => "webhook signing secret is not configured",
        /// The signature, timestamp, or their encoding did not check out.
        InvalidSignature { reason: String } => "webhook signature rejected: {reason}",
    }
}

/// One or more signature headers were absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing signature headers: {}", .missing.join(", "))]
pub struct MissingHeaders {
    missing: Vec<&'static str>,
}

impl MissingHeaders {
    /// Names of the headers that were not supplied.
    #[must_use]
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }
}

/// Signature headers accompanying a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    id: String,
    timestamp: String,
    signature: String,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl SignedEnvelope {
    /// Build an envelope from raw header values.
    ///
    /// # Errors
    /// Returns [`MissingHeaders`] naming every header that is absent or empty.
    ///
    /// # Examples
    /// ```
    /// use kontaktar_backend::domain::ports::SignedEnvelope;
    ///
    /// let err = SignedEnvelope::from_headers(Some("msg_1"), None, Some(""))
    ///     .expect_err("two headers missing");
    /// assert_eq!(err.missing(), ["svix-timestamp", "svix-signature"]);
    /// ```
    pub fn from_headers(
        id: Option<&str>,
        timestamp: Option<&str>,
        signature: Option<&str>,
    ) -> Result<Self, MissingHeaders> {
        match (present(id), present(timestamp), present(signature)) {
            (Some(id), Some(timestamp), Some(signature)) => Ok(Self {
                id: id.to_owned(),
                timestamp: timestamp.to_owned(),
                signature: signature.to_owned(),
            }),
            (id, timestamp, signature) => {
                let missing = [
                    (id.is_none(), SVIX_ID_HEADER),
                    (timestamp.is_none(), SVIX_TIMESTAMP_HEADER),
                    (signature.is_none(), SVIX_SIGNATURE_HEADER),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();
                Err(MissingHeaders { missing })
            }
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// Authenticates a delivery before its body is interpreted.
#[cfg_attr(test, mockall::automock)]
pub trait WebhookVerifier: Send + Sync {
    /// Check `body` against the envelope's signatures.
    fn verify(&self, envelope: &SignedEnvelope, body: &[u8]) -> Result<(), VerificationError>;
}
