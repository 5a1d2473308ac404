// src/server/mod.rs

//! Server layer root module.
//!
//! This module organizes the backend server components:
//! - Application state management
//! - HTTP/WebSocket routing
//! - The match session (state machine, single-writer actor, connection actors)
//! - Per-connection flood protection and error frames

pub mod anti_spam;
pub mod match_session;
pub mod router;
pub mod state;
pub mod ws_error;
