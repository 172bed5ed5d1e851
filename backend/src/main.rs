//! Backend entry-point: loads settings, wires adapters, and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use kontaktar_backend::inbound::http::health::HealthState;
use server::{
    AppSettings, build_http_state, build_user_repository, build_webhook_verifier, create_server,
    drain, shutdown_signal,
};

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let bind_addr = settings.bind_addr()?;
    let store_timeout = settings.store_timeout()?;
    let origins = settings.cors_origins()?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let users = build_user_repository(
        settings.database_url(),
        settings.db_max_connections()?,
        store_timeout,
    );
    let verifier = build_webhook_verifier(settings.webhook_secret(), clock.clone())
        .wrap_err("webhook secret is malformed")?;
    let http_state = build_http_state(users, verifier, clock, store_timeout);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, bind_addr, origins)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    let handle = server.handle();
    actix_web::rt::spawn(async move {
        match shutdown_signal().await {
            Ok(()) => drain(handle, health_state).await,
            Err(err) => error!(error = %err, "cannot listen for shutdown signals"),
        }
    });
    info!(%bind_addr, "listening");
    server.await.wrap_err("server terminated abnormally")?;
    Ok(())
}
