use std::sync::Arc;

use dotenvy::dotenv;
use vendure_actions::{build_server, HttpGraphqlClient, Settings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env().expect("Invalid configuration");
    let client = HttpGraphqlClient::new(&settings.client_id, settings.request_timeout)
        .expect("Failed to build the GraphQL HTTP client");

    log::info!(
        "Starting server at http://{}:{} (GraphQL timeout {:?})",
        settings.host,
        settings.port,
        settings.request_timeout
    );

    build_server(Arc::new(client), &settings.host, settings.port)?.await
}
