//! Builders selecting adapters for the HTTP state from settings.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::Clock;
use tracing::{error, info, warn};

use kontaktar_backend::domain::ports::{UserRepository, WebhookVerifier};
use kontaktar_backend::domain::{UserDirectoryService, WebhookSyncService};
use kontaktar_backend::inbound::http::state::HttpState;
use kontaktar_backend::outbound::memory::InMemoryUserRepository;
use kontaktar_backend::outbound::persistence::{DieselUserRepository, LazyDbPool, PoolConfig};
use kontaktar_backend::outbound::svix::{
    SvixWebhookVerifier, UnconfiguredWebhookVerifier, WebhookSecret, WebhookSecretError,
};

/// Pick the user store: PostgreSQL when a URL is configured, memory otherwise.
///
/// The pool is not opened here; the first store call builds it.
pub fn build_user_repository(
    database_url: Option<&str>,
    max_connections: u32,
    store_timeout: Duration,
) -> Arc<dyn UserRepository> {
    match database_url {
        Some(url) => {
            let config = PoolConfig::new(url)
                .with_max_size(max_connections)
                .with_connection_timeout(store_timeout);
            info!(max_connections, "using PostgreSQL user store");
            Arc::new(DieselUserRepository::new(LazyDbPool::new(config)))
        }
        None => {
            warn!("no database URL configured; users are kept in memory and lost on restart");
            Arc::new(InMemoryUserRepository::new())
        }
    }
}

/// Pick the webhook verifier.
///
/// A missing secret keeps the service up but fails every delivery with an
/// internal error; a malformed one is rejected so start-up fails.
pub fn build_webhook_verifier(
    secret: Option<&str>,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn WebhookVerifier>, WebhookSecretError> {
    match secret {
        Some(raw) => {
            let secret = WebhookSecret::parse(raw)?;
            Ok(Arc::new(SvixWebhookVerifier::new(secret, clock)))
        }
        None => {
            error!("no webhook secret configured; every webhook delivery will be refused");
            Ok(Arc::new(UnconfiguredWebhookVerifier))
        }
    }
}

/// Wire the domain services over the chosen adapters.
pub fn build_http_state(
    users: Arc<dyn UserRepository>,
    verifier: Arc<dyn WebhookVerifier>,
    clock: Arc<dyn Clock>,
    store_timeout: Duration,
) -> web::Data<HttpState> {
    let webhook =
        WebhookSyncService::new(users.clone(), verifier, clock).with_store_timeout(store_timeout);
    let directory = UserDirectoryService::new(users);
    web::Data::new(HttpState::new(Arc::new(webhook), Arc::new(directory)))
}
