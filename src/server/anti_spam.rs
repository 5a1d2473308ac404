use std::time::{Duration, Instant};

use log::warn;

use crate::config::anti_spam::MAX_REQUESTS_PER_SECOND;
use crate::game::types::ConnectionId;

/// Tracks anti-flood state for a single connection.
pub struct AntiSpamState {
    // Last error code sent (for suppression)
    last_error_code: Option<String>,
    // Start of the current one-second window
    last_tick: Instant,
    requests_this_tick: u32,
}

impl AntiSpamState {
    pub fn new() -> Self {
        Self {
            last_error_code: None,
            last_tick: Instant::now(),
            requests_this_tick: 0,
        }
    }

    /// Call for every incoming frame.
    /// Returns true if the connection exceeded its rate and must be closed.
    pub fn record_request(&mut self, conn: &ConnectionId) -> bool {
        self.record_request_at(conn, Instant::now())
    }

    fn record_request_at(&mut self, conn: &ConnectionId, now: Instant) -> bool {
        if now.duration_since(self.last_tick) >= Duration::from_secs(1) {
            self.last_tick = now;
            self.requests_this_tick = 0;
        }
        self.requests_this_tick += 1;
        if self.requests_this_tick > MAX_REQUESTS_PER_SECOND {
            warn!(
                "[AntiSpam] Connection {} sent {} frames within a second",
                conn, self.requests_this_tick
            );
            return true;
        }
        false
    }

    /// Call when sending an error. Returns true if the error should be sent (not suppressed).
    pub fn should_send_error(&mut self, error_code: &str, conn: &ConnectionId) -> bool {
        if self.last_error_code.as_deref() == Some(error_code) {
            warn!("[AntiSpam] Suppressed duplicate error '{}' for connection {}", error_code, conn);
            return false;
        }
        self.last_error_code = Some(error_code.to_string());
        true
    }

    /// Call when a valid command is forwarded.
    pub fn reset_error_suppression(&mut self) {
        self.last_error_code = None;
    }
}

impl Default for AntiSpamState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_flood_detected_within_one_second() {
        let conn = Uuid::new_v4();
        let mut state = AntiSpamState::new();
        let now = Instant::now();
        for _ in 0..MAX_REQUESTS_PER_SECOND {
            assert!(!state.record_request_at(&conn, now));
        }
        assert!(state.record_request_at(&conn, now));
    }

    #[test]
    fn test_counter_resets_each_second() {
        let conn = Uuid::new_v4();
        let mut state = AntiSpamState::new();
        let start = Instant::now();
        for _ in 0..MAX_REQUESTS_PER_SECOND {
            state.record_request_at(&conn, start);
        }
        assert!(!state.record_request_at(&conn, start + Duration::from_secs(1)));
    }

    #[test]
    fn test_duplicate_errors_suppressed() {
        let conn = Uuid::new_v4();
        let mut state = AntiSpamState::new();
        assert!(state.should_send_error("INVALID_MESSAGE", &conn));
        assert!(!state.should_send_error("INVALID_MESSAGE", &conn));
        assert!(state.should_send_error("INVALID_NAME", &conn));

        state.reset_error_suppression();
        assert!(state.should_send_error("INVALID_NAME", &conn));
    }
}
