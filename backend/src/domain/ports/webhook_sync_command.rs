//! Driving port for identity-provider webhook deliveries.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Error, UserId};

use super::SignedEnvelope;

/// Store mutation applied for a processed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Inserted,
    Updated,
}

impl SyncAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::Updated => "updated",
        }
    }
}

/// Result of an accepted delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A create or update was applied to the store.
    Processed { user_id: UserId, action: SyncAction },
    /// A deletion was acknowledged; the local record is kept.
    Retained { user_id: Option<UserId> },
    /// The event type is not one this service acts on.
    Ignored { event_type: String },
}

impl WebhookOutcome {
    /// Short label used in structured logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Processed { .. } => "processed",
            Self::Retained { .. } => "retained",
            Self::Ignored { .. } => "ignored",
        }
    }
}

impl fmt::Display for WebhookOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Authenticate, decode, and apply one webhook delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookSyncCommand: Send + Sync {
    /// `body` must be the request body bytes exactly as received.
    async fn synchronise(
        &self,
        envelope: &SignedEnvelope,
        body: &[u8],
    ) -> Result<WebhookOutcome, Error>;
}
