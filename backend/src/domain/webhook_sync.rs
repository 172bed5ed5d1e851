//! Webhook synchroniser: mirrors identity-provider user lifecycle events into
//! the local user store.
//!
//! Each delivery is verified against the raw body, decoded once into an
//! [`IdentityEvent`], and applied with at most one successful store mutation.
//! Replays converge: a repeated `user.created` becomes a contact update and a
//! `user.updated` for an unknown id inserts the record.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::identity_events::{EventDecodeError, IdentityEvent, ProviderUser};
use crate::domain::ports::{
    MissingHeaders, SignedEnvelope, SyncAction, UserPersistenceError, UserRepository,
    VerificationError, WebhookOutcome, WebhookSyncCommand, WebhookVerifier,
};
use crate::domain::{Error, User, UserPatch};

/// Store calls made while handling a delivery give up after this long.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Reasons a delivery was not applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookSyncError {
    #[error(transparent)]
    MissingHeaders(#[from] MissingHeaders),
    #[error("webhook signature rejected: {reason}")]
    InvalidSignature { reason: String },
    #[error(transparent)]
    MalformedPayload(#[from] EventDecodeError),
    #[error("webhook signing secret is not configured")]
    MissingSecret,
    #[error(transparent)]
    Store(#[from] UserPersistenceError),
    #[error("user store did not answer within {timeout:?}")]
    StoreTimeout { timeout: Duration },
}

impl From<VerificationError> for WebhookSyncError {
    fn from(value: VerificationError) -> Self {
        match value {
            VerificationError::SecretNotConfigured => Self::MissingSecret,
            VerificationError::InvalidSignature { reason } => Self::InvalidSignature { reason },
        }
    }
}

impl From<WebhookSyncError> for Error {
    fn from(value: WebhookSyncError) -> Self {
        match value {
            WebhookSyncError::MissingHeaders(missing) => {
                Error::invalid_request("Missing svix headers").with_details(json!({
                    "code": "missing_signature_headers",
                    "missing": missing.missing(),
                }))
            }
            WebhookSyncError::InvalidSignature { .. } => Error::invalid_request(
                "Error verifying webhook",
            )
            .with_details(json!({ "code": "invalid_signature" })),
            WebhookSyncError::MalformedPayload(err) => Error::invalid_request(
                "Malformed webhook payload",
            )
            .with_details(json!({ "code": "malformed_payload", "reason": err.to_string() })),
            other @ (WebhookSyncError::MissingSecret
            | WebhookSyncError::Store(_)
            | WebhookSyncError::StoreTimeout { .. }) => Error::internal(other.to_string()),
        }
    }
}

/// Domain service implementing [`WebhookSyncCommand`].
#[derive(Clone)]
pub struct WebhookSyncService {
    users: Arc<dyn UserRepository>,
    verifier: Arc<dyn WebhookVerifier>,
    clock: Arc<dyn Clock>,
    store_timeout: Duration,
}

impl WebhookSyncService {
    /// Create a service using [`DEFAULT_STORE_TIMEOUT`].
    pub fn new(
        users: Arc<dyn UserRepository>,
        verifier: Arc<dyn WebhookVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            verifier,
            clock,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Override the per-call store timeout.
    #[must_use]
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Verify, decode, and apply one delivery.
    ///
    /// Nothing touches the store until the signature has been accepted and
    /// the body decoded.
    ///
    /// # Errors
    /// See [`WebhookSyncError`]; every variant is logged before returning.
    pub async fn process(
        &self,
        envelope: &SignedEnvelope,
        body: &[u8],
    ) -> Result<WebhookOutcome, WebhookSyncError> {
        if let Err(err) = self.verifier.verify(envelope, body) {
            let err = WebhookSyncError::from(err);
            match &err {
                WebhookSyncError::MissingSecret => error!(
                    svix_id = envelope.id(),
                    error = %err,
                    "webhook rejected: signing secret missing"
                ),
                _ => warn!(
                    svix_id = envelope.id(),
                    error = %err,
                    "webhook rejected: verification failed"
                ),
            }
            return Err(err);
        }

        let event = IdentityEvent::decode(body).map_err(|err| {
            warn!(svix_id = envelope.id(), error = %err, "webhook rejected: malformed payload");
            WebhookSyncError::from(err)
        })?;

        let event_type = event.event_type().to_owned();
        let user_id = event.user_id().map(ToString::to_string);
        let result = self.apply(event).await;
        match &result {
            Ok(outcome) => info!(
                svix_id = envelope.id(),
                event_type = %event_type,
                user_id = user_id.as_deref(),
                outcome = outcome.label(),
                "webhook event handled"
            ),
            Err(err) => error!(
                svix_id = envelope.id(),
                event_type = %event_type,
                user_id = user_id.as_deref(),
                outcome = "failed",
                error = %err,
                "webhook event failed"
            ),
        }
        result
    }

    async fn apply(&self, event: IdentityEvent) -> Result<WebhookOutcome, WebhookSyncError> {
        match event {
            IdentityEvent::Created(user) => self.create(user).await,
            IdentityEvent::Updated(user) => self.update(user).await,
            IdentityEvent::Deleted { id } => Ok(WebhookOutcome::Retained { user_id: id }),
            IdentityEvent::Unknown(event_type) => Ok(WebhookOutcome::Ignored { event_type }),
        }
    }

    async fn create(&self, user: ProviderUser) -> Result<WebhookOutcome, WebhookSyncError> {
        match self.insert(&user).await {
            Err(WebhookSyncError::Store(UserPersistenceError::Duplicate { .. })) => {
                debug!(user_id = %user.id(), "replayed create converges to contact update");
                self.patch_existing(&user).await
            }
            other => other,
        }
    }

    async fn update(&self, user: ProviderUser) -> Result<WebhookOutcome, WebhookSyncError> {
        let patch = UserPatch::contact(user.contact().clone());
        match self.bounded(self.users.update(user.id(), &patch)).await? {
            Some(stored) => Ok(processed(&stored, SyncAction::Updated)),
            None => {
                debug!(user_id = %user.id(), "update for unknown user inserts it");
                match self.insert(&user).await {
                    // Lost a race with a concurrent create.
                    Err(WebhookSyncError::Store(UserPersistenceError::Duplicate { .. })) => {
                        self.patch_existing(&user).await
                    }
                    other => other,
                }
            }
        }
    }

    async fn insert(&self, user: &ProviderUser) -> Result<WebhookOutcome, WebhookSyncError> {
        let record = User::register(user.id().clone(), user.contact().clone(), self.clock.utc());
        let stored = self.bounded(self.users.insert(&record)).await?;
        Ok(processed(&stored, SyncAction::Inserted))
    }

    async fn patch_existing(
        &self,
        user: &ProviderUser,
    ) -> Result<WebhookOutcome, WebhookSyncError> {
        let patch = UserPatch::contact(user.contact().clone());
        self.bounded(self.users.update(user.id(), &patch))
            .await?
            .map(|stored| processed(&stored, SyncAction::Updated))
            .ok_or_else(|| {
                WebhookSyncError::Store(UserPersistenceError::query(format!(
                    "user {} disappeared while converging",
                    user.id()
                )))
            })
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, WebhookSyncError>
    where
        F: Future<Output = Result<T, UserPersistenceError>>,
    {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| WebhookSyncError::StoreTimeout {
                timeout: self.store_timeout,
            })?
            .map_err(WebhookSyncError::from)
    }
}

fn processed(user: &User, action: SyncAction) -> WebhookOutcome {
    WebhookOutcome::Processed {
        user_id: user.id().clone(),
        action,
    }
}

#[async_trait]
impl WebhookSyncCommand for WebhookSyncService {
    async fn synchronise(
        &self,
        envelope: &SignedEnvelope,
        body: &[u8],
    ) -> Result<WebhookOutcome, Error> {
        self.process(envelope, body).await.map_err(Error::from)
    }
}
