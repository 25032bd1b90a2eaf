//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use medbook::Trace;
#[cfg(debug_assertions)]
use medbook::doc::ApiDoc;
use medbook::inbound::http::configure_api;
use medbook::inbound::http::health::{HealthState, live, ready};
use medbook::inbound::http::state::HttpState;

use state_builders::build_booking_ports;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Build the booking server and mark it ready.
///
/// # Errors
/// Propagates adapter start-up failures and socket binding errors.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ports = build_booking_ports(&config).await?;
    let http_state = web::Data::new(HttpState::from_ports(ports));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(config.bind_addr())?
        .run();

    info!(addr = %config.bind_addr(), "booking server listening");
    health_state.mark_ready();
    Ok(server)
}
