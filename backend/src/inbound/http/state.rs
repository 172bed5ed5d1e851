//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on driving ports,
//! so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{UserDirectory, WebhookSyncCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub webhook: Arc<dyn WebhookSyncCommand>,
    pub users: Arc<dyn UserDirectory>,
}

impl HttpState {
    pub fn new(webhook: Arc<dyn WebhookSyncCommand>, users: Arc<dyn UserDirectory>) -> Self {
        Self { webhook, users }
    }
}
