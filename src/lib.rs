pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;

use std::net::TcpListener;

use actix_web::{middleware::Logger, web, App, HttpServer};

pub use config::Settings;
pub use domain::ports::{GraphqlTransport, SharedTransport};
pub use errors::AppError;
pub use handlers::AppState;
pub use infrastructure::HttpGraphqlClient;

/// Malformed JSON bodies become a 400 with the same `{"error": ...}` shape
/// as every other rejected request.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    transport: SharedTransport,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let listener = TcpListener::bind((host, port))?;
    build_server_with_listener(transport, listener)
}

/// Same as [`build_server`] on an already bound listener, so tests can bind
/// port 0 and read the assigned address back.
pub fn build_server_with_listener(
    transport: SharedTransport,
    listener: TcpListener,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(AppState::new(transport));
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(json_config())
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .listen(listener)?
    .run())
}
