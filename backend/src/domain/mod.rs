//! Domain primitives, services, and ports.
//!
//! Purpose: keep the user model and the webhook synchronisation rules free of
//! transport and storage concerns. Inbound adapters call the driving ports in
//! [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - TraceId: request correlation identifier.
//! - User and its value types.
//! - WebhookSyncService / UserDirectoryService: the use-cases.

pub mod error;
pub mod identity_events;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_directory;
pub mod webhook_sync;

pub use self::error::{Error, ErrorCode};
pub use self::identity_events::{EventDecodeError, IdentityEvent, ProviderUser};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    ContactDetails, DisplayName, Role, User, UserId, UserPatch, UserValidationError,
};
pub use self::user_directory::UserDirectoryService;
pub use self::webhook_sync::{DEFAULT_STORE_TIMEOUT, WebhookSyncError, WebhookSyncService};
