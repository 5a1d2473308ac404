//! HTTP and WebSocket routing configuration.
//!
//! The match is played over a single WebSocket endpoint; a read-only JSON
//! view of the current state is exposed next to it.

use actix_web::web;

use crate::config::server::WS_PATH;
use crate::server::match_session::session::{match_state, ws_match};

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(WS_PATH).route(web::get().to(ws_match)))
        .service(web::resource("/state").route(web::get().to(match_state)));
}
