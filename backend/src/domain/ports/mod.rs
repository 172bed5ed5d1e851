//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`UserRepository`], [`WebhookVerifier`]) describe what the
//! domain needs from adapters; driving ports ([`WebhookSyncCommand`],
//! [`UserDirectory`]) are what inbound adapters call. Each exposes strongly
//! typed errors so adapters map their failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod user_directory;
mod user_repository;
mod webhook_sync_command;
mod webhook_verifier;

#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use webhook_sync_command::MockWebhookSyncCommand;
pub use webhook_sync_command::{SyncAction, WebhookOutcome, WebhookSyncCommand};
#[cfg(test)]
pub use webhook_verifier::MockWebhookVerifier;
pub use webhook_verifier::{
    MissingHeaders, SVIX_ID_HEADER, SVIX_SIGNATURE_HEADER, SVIX_TIMESTAMP_HEADER, SignedEnvelope,
    VerificationError, WebhookVerifier,
};
