/// Network configuration constants.
///
/// This module defines where the HTTP server listens and the path of the
/// WebSocket endpoint clients connect to.
pub const HOST: &str = "127.0.0.1";

/// Default listening port, overridable with the `PORT` environment variable.
pub const PORT: u16 = 5050;

/// Path of the match WebSocket endpoint.
pub const WS_PATH: &str = "/real-time";

/// Resolve the listening port from the environment, falling back to [`PORT`].
pub fn port_from_env() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(PORT)
}
