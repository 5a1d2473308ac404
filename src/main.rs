//! Main entry point for the match server.
//!
//! Initializes logging, starts the match server actor, and launches the HTTP
//! server with the match WebSocket endpoint.

use actix::Actor;
use actix_web::{App, HttpServer, web};
use log::info;

use config::server::{HOST, WS_PATH, port_from_env};
use server::match_session::MatchServer;

pub mod config;
mod game;
mod server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Start the MatchServer actor (sole owner of the match state).
    let match_server = MatchServer::new().start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(match_server));

    let port = port_from_env();
    info!("[Main] Listening on ws://{}:{}{}", HOST, port, WS_PATH);

    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*")),
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((HOST, port))?
    .run()
    .await
}
