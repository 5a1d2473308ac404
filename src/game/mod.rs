//! Pure game domain: choices, round resolution and the match state.
//!
//! Nothing here knows about actors or sockets; the server layer drives it.

pub mod resolver;
pub mod state;
pub mod types;
