//! Svix-compatible webhook signature verification.
//!
//! The identity provider delivers webhooks through Svix, which signs
//! `"{svix-id}.{svix-timestamp}.{body}"` with HMAC-SHA256 under a shared
//! secret published as `whsec_<base64>`. The `svix-signature` header carries
//! space-separated `version,base64` entries; any matching `v1` entry accepts
//! the delivery.

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use mockable::Clock;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::domain::ports::{SignedEnvelope, VerificationError, WebhookVerifier};

type HmacSha256 = Hmac<Sha256>;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";
/// Accepted clock skew between the signer and this service, in seconds.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

/// Errors parsing a configured signing secret.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookSecretError {
    #[error("webhook secret is empty")]
    Empty,
    #[error("webhook secret is not valid base64: {message}")]
    Encoding { message: String },
}

/// Decoded signing key, wiped from memory on drop.
#[derive(Clone)]
pub struct WebhookSecret(Zeroizing<Vec<u8>>);

impl WebhookSecret {
    /// Decode a secret as shown in the provider dashboard.
    ///
    /// # Errors
    /// Returns [`WebhookSecretError`] when the value is blank or not base64.
    ///
    /// # Examples
    /// ```
    /// use kontaktar_backend::outbound::svix::WebhookSecret;
    ///
    /// assert!(WebhookSecret::parse("whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw").is_ok());
    /// assert!(WebhookSecret::parse("whsec_").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, WebhookSecretError> {
        let trimmed = raw.trim();
        let encoded = trimmed.strip_prefix(SECRET_PREFIX).unwrap_or(trimmed);
        if encoded.is_empty() {
            return Err(WebhookSecretError::Empty);
        }
        STANDARD
            .decode(encoded)
            .map(|bytes| Self(Zeroizing::new(bytes)))
            .map_err(|err| WebhookSecretError::Encoding {
                message: err.to_string(),
            })
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(<redacted>)")
    }
}

/// [`WebhookVerifier`] implementing the Svix `v1` scheme.
#[derive(Clone)]
pub struct SvixWebhookVerifier {
    secret: WebhookSecret,
    clock: Arc<dyn Clock>,
}

impl SvixWebhookVerifier {
    pub fn new(secret: WebhookSecret, clock: Arc<dyn Clock>) -> Self {
        Self { secret, clock }
    }

    fn mac(&self, id: &str, timestamp: &str, body: &[u8]) -> Result<HmacSha256, VerificationError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret.0)
            .map_err(|_| VerificationError::invalid_signature("signing key rejected by HMAC"))?;
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        Ok(mac)
    }

    /// Produce a `v1,<base64>` signature entry for a delivery.
    ///
    /// # Errors
    /// Fails only if the HMAC key is rejected.
    pub fn sign(&self, id: &str, timestamp: &str, body: &[u8]) -> Result<String, VerificationError> {
        let digest = self.mac(id, timestamp, body)?.finalize().into_bytes();
        Ok(format!("{SIGNATURE_VERSION},{}", STANDARD.encode(digest)))
    }

    fn check_timestamp(&self, timestamp: &str) -> Result<(), VerificationError> {
        let signed_at: i64 = timestamp.parse().map_err(|_| {
            VerificationError::invalid_signature("timestamp is not integer Unix seconds")
        })?;
        let now = self.clock.utc().timestamp();
        if now.saturating_sub(signed_at) > TIMESTAMP_TOLERANCE_SECS {
            return Err(VerificationError::invalid_signature("timestamp too old"));
        }
        if signed_at.saturating_sub(now) > TIMESTAMP_TOLERANCE_SECS {
            return Err(VerificationError::invalid_signature("timestamp too new"));
        }
        Ok(())
    }
}

impl WebhookVerifier for SvixWebhookVerifier {
    fn verify(&self, envelope: &SignedEnvelope, body: &[u8]) -> Result<(), VerificationError> {
        self.check_timestamp(envelope.timestamp())?;
        let mac = self.mac(envelope.id(), envelope.timestamp(), body)?;

        let matched = envelope
            .signature()
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, signature)| STANDARD.decode(signature).ok())
            .any(|signature| mac.clone().verify_slice(&signature).is_ok());

        if matched {
            Ok(())
        } else {
            Err(VerificationError::invalid_signature(
                "no matching v1 signature",
            ))
        }
    }
}

/// Stand-in used when no secret is configured: rejects every delivery.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredWebhookVerifier;

impl WebhookVerifier for UnconfiguredWebhookVerifier {
    fn verify(&self, _envelope: &SignedEnvelope, _body: &[u8]) -> Result<(), VerificationError> {
        Err(VerificationError::secret_not_configured())
    }
}
