use std::collections::HashMap;

use actix::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::registry::JoinRejected;
use crate::game::state::{MatchState, Player};
use crate::game::types::{Choice, ConnectionId, NameError, PlayerName, RoundWinner};

// Client -> server, as received on the wire.
#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "action", content = "data", rename_all = "kebab-case")]
pub enum ClientWsMessage {
    JoinRequest { name: String },
    ChoiceSubmit { choice: Choice },
    ResetRequest,
    Ping,
}

/// A client request that passed boundary validation and may be handed to the
/// match state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchCommand {
    Join(PlayerName),
    Choose(Choice),
    Reset,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid player name: {0}")]
    InvalidName(#[from] NameError),
}

impl ClientWsMessage {
    /// Validate the payload. Keepalives carry no command and yield `None`.
    pub fn into_command(self) -> Result<Option<MatchCommand>, CommandError> {
        Ok(match self {
            ClientWsMessage::JoinRequest { name } => Some(MatchCommand::Join(PlayerName::parse(&name)?)),
            ClientWsMessage::ChoiceSubmit { choice } => Some(MatchCommand::Choose(choice)),
            ClientWsMessage::ResetRequest => Some(MatchCommand::Reset),
            ClientWsMessage::Ping => None,
        })
    }
}

/// Payload of a round result broadcast.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub player1_choice: Choice,
    pub player2_choice: Choice,
    pub round_winner: RoundWinner,
    pub scores: HashMap<ConnectionId, u8>,
    pub game_winner: Option<ConnectionId>,
    pub current_round: u32,
}

// Server -> client
#[derive(Message, Serialize, Clone, Debug)]
#[rtype(result = "()")]
#[serde(
    tag = "action",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerWsMessage {
    StateSnapshot(MatchState),
    PlayerJoined {
        player: Player,
        total_players: usize,
    },
    MatchStart,
    RoundResult(RoundResult),
    NextRound,
    MatchReset,
    PlayerLeft {
        player_id: ConnectionId,
        remaining_players: usize,
    },
    JoinRejected {
        reason: JoinRejected,
    },
    Error {
        code: String,
        message: String,
    },
}

impl ServerWsMessage {
    pub fn error(code: &str, message: &str) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// A connection opened; registers its outbound mailbox with the match server.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub id: ConnectionId,
    pub addr: Recipient<ServerWsMessage>,
}

/// A connection closed, for whatever reason.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub id: ConnectionId,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct ClientCommand {
    pub id: ConnectionId,
    pub command: MatchCommand,
}

/// Read the current match state (used by the HTTP state endpoint).
#[derive(Message)]
#[rtype(result = "MatchState")]
pub struct GetMatchState;
