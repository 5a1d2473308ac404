// src/server/state.rs

//! Application state for the backend server.
//!
//! Holds the address of the match server actor, shared between HTTP/WebSocket
//! handlers and the actor system.

use actix::Addr;

use crate::server::match_session::server::MatchServer;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the match server actor (sole owner of the match state).
    pub match_server: Addr<MatchServer>,
}

impl AppState {
    pub fn new(match_server: Addr<MatchServer>) -> Self {
        AppState { match_server }
    }
}
