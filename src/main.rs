use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tento_quizgen::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    config
        .validate()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let state = AppState::new(config).map_err(|e| io::Error::other(e.to_string()))?;

    log::info!("Starting HTTP server on {}:{}", host, port);
    log::info!("Completion provider: {}", state.provider_name);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
