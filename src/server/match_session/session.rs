/// WebSocket session handler for a match connection.
///
/// This actor manages a single client connection: it registers with the match
/// server on start, validates incoming frames at the protocol boundary before
/// relaying them as commands, reports disconnects, and serializes server
/// messages back to the client.
use actix::prelude::*;
use actix_web::{Error, HttpRequest, HttpResponse, http::StatusCode, web};
use actix_web_actors::ws;
use log::{debug, info, warn};
use uuid::Uuid;

use super::messages::{ClientCommand, ClientWsMessage, Connect, Disconnect, GetMatchState, ServerWsMessage};
use super::server::MatchServer;
use crate::game::types::ConnectionId;
use crate::server::anti_spam::AntiSpamState;
use crate::server::state::AppState;
use crate::server::ws_error::{
    INTERNAL_ERROR_FRAME, INVALID_MESSAGE, INVALID_NAME, http_error_response, ws_error_message,
};

/// One client's WebSocket connection to the match.
pub struct MatchConnection {
    pub id: ConnectionId,
    pub server: Addr<MatchServer>,
    anti_spam: AntiSpamState,
}

impl MatchConnection {
    pub fn new(id: ConnectionId, server: Addr<MatchServer>) -> Self {
        Self {
            id,
            server,
            anti_spam: AntiSpamState::new(),
        }
    }

    fn send_error(&mut self, ctx: &mut ws::WebsocketContext<Self>, code: &str, message: &str) {
        if self.anti_spam.should_send_error(code, &self.id) {
            ctx.text(ws_error_message(code, message));
        }
    }

    fn handle_text(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let msg = match serde_json::from_str::<ClientWsMessage>(text) {
            Ok(msg) => msg,
            Err(e) => {
                debug!("[MatchConnection] {} sent an invalid frame: {}", self.id, e);
                self.send_error(ctx, INVALID_MESSAGE, "Invalid client message");
                return;
            }
        };
        match msg.into_command() {
            Ok(Some(command)) => {
                self.anti_spam.reset_error_suppression();
                self.server.do_send(ClientCommand { id: self.id, command });
            }
            // Keepalive.
            Ok(None) => {}
            Err(e) => {
                warn!("[MatchConnection] {} sent an invalid command: {}", self.id, e);
                self.send_error(ctx, INVALID_NAME, &e.to_string());
            }
        }
    }
}

impl Actor for MatchConnection {
    type Context = ws::WebsocketContext<Self>;

    /// Registers the connection with the match server, which replies with a state snapshot.
    fn started(&mut self, ctx: &mut Self::Context) {
        self.server.do_send(Connect {
            id: self.id,
            addr: ctx.address().recipient(),
        });
    }

    /// Any way a connection ends counts as a disconnect.
    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[MatchConnection] {} stopped", self.id);
        self.server.do_send(Disconnect { id: self.id });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for MatchConnection {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        if self.anti_spam.record_request(&self.id) {
            ctx.close(Some(ws::CloseReason {
                code: ws::CloseCode::Policy,
                description: Some("Too many messages".into()),
            }));
            ctx.stop();
            return;
        }
        match msg {
            Ok(ws::Message::Text(text)) => self.handle_text(&text, ctx),
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(_) => (),
            Err(e) => {
                warn!("[MatchConnection] {} protocol error: {}", self.id, e);
                ctx.stop();
            }
        }
    }
}

impl Handler<ServerWsMessage> for MatchConnection {
    type Result = ();

    fn handle(&mut self, msg: ServerWsMessage, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                // Serialization error: notify client and close connection.
                warn!("[MatchConnection] Failed to serialize ServerWsMessage: {}", e);
                ctx.text(INTERNAL_ERROR_FRAME);
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Error,
                    description: Some("Internal server error".into()),
                }));
                ctx.stop();
            }
        }
    }
}

/// WebSocket endpoint for the match. Every connection gets a fresh id.
pub async fn ws_match(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = Uuid::new_v4();
    info!("[MatchConnection] New connection {} from {:?}", id, req.peer_addr());
    ws::start(MatchConnection::new(id, data.match_server.clone()), &req, stream)
}

/// Current match state as JSON.
pub async fn match_state(data: web::Data<AppState>) -> HttpResponse {
    match data.match_server.send(GetMatchState).await {
        Ok(state) => HttpResponse::Ok().json(state),
        Err(e) => {
            warn!("[MatchConnection] Match server unreachable: {}", e);
            http_error_response("UNAVAILABLE", "Match server unavailable", StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
