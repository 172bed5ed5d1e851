//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::AppSettings;
pub use state_builders::{build_http_state, build_user_repository, build_webhook_verifier};

use std::net::SocketAddr;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use kontaktar_backend::Trace;
#[cfg(debug_assertions)]
use kontaktar_backend::doc::ApiDoc;
use kontaktar_backend::inbound::http::cors::{AllowedOrigins, cors};
use kontaktar_backend::inbound::http::error::json_config;
use kontaktar_backend::inbound::http::health::{HealthState, health, info, live, ready};
use kontaktar_backend::inbound::http::state::HttpState;
use kontaktar_backend::inbound::http::users;
use kontaktar_backend::inbound::http::webhook::clerk_webhook;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    origins: &AllowedOrigins,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(cors(origins))
        .wrap(Trace)
        .service(clerk_webhook)
        .configure(users::configure)
        .service(info)
        .service(health)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/documentation/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app
}

/// Bind the HTTP server and mark the service ready.
///
/// Signal handling is left to [`shutdown_signal`] and [`drain`] so liveness
/// fails before connections close.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    bind_addr: SocketAddr,
    origins: AllowedOrigins,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone(), &origins)
    })
    .disable_signals()
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Resolve on Ctrl-C, or on SIGTERM where available.
///
/// # Errors
/// Fails when a signal listener cannot be installed.
pub async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

/// Fail liveness, then stop accepting connections and let in-flight
/// requests finish.
pub async fn drain(handle: ServerHandle, health_state: web::Data<HealthState>) {
    health_state.mark_unhealthy();
    tracing::info!("draining HTTP server");
    handle.stop(true).await;
}
