/// Centralized helpers for WebSocket and HTTP error responses.
///
/// Use these helpers to ensure all error messages are consistent and carry a code.
use actix_web::{HttpResponse, http::StatusCode};

use crate::server::match_session::messages::ServerWsMessage;

/// Frame could not be parsed as a client message.
pub const INVALID_MESSAGE: &str = "INVALID_MESSAGE";
/// Join request carried a name outside 1..=15 characters.
pub const INVALID_NAME: &str = "INVALID_NAME";

/// Sent verbatim when an outbound message cannot be serialized.
pub const INTERNAL_ERROR_FRAME: &str =
    r#"{"action":"error","data":{"code":"INTERNAL","message":"Internal server error"}}"#;

/// Formats a WebSocket error message as a JSON string.
///
/// # Arguments
/// - `code`: Unique error code (e.g. "INVALID_MESSAGE").
/// - `message`: Human-readable error message (in English).
pub fn ws_error_message(code: &str, message: &str) -> String {
    serde_json::to_string(&ServerWsMessage::error(code, message))
        .unwrap_or_else(|_| INTERNAL_ERROR_FRAME.to_string())
}

/// Returns an HTTP error response with a JSON body.
pub fn http_error_response(code: &str, message: &str, status: StatusCode) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": { "code": code, "message": message }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_error_message_shape() {
        let text = ws_error_message(INVALID_NAME, "name \"too\" long");
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["action"], "error");
        assert_eq!(value["data"]["code"], "INVALID_NAME");
        assert_eq!(value["data"]["message"], "name \"too\" long");
    }

    #[test]
    fn test_internal_error_frame_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(INTERNAL_ERROR_FRAME).unwrap();
        assert_eq!(value["data"]["code"], "INTERNAL");
    }

    #[test]
    fn test_http_error_response_status() {
        let resp = http_error_response("UNAVAILABLE", "match server unavailable", StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
