//! Session registry: which connections are live, and which of them hold a seat.
//!
//! The connection table lives here; seats live in the [`MatchState`] itself so
//! the two can never drift. Admission rules for taking a seat are enforced by
//! [`seat`], and [`unseat`] is the disconnect cleanup.

use std::collections::HashMap;

use actix::Recipient;
use log::debug;
use serde::Serialize;
use thiserror::Error;

use super::messages::ServerWsMessage;
use crate::game::state::{MatchState, Player};
use crate::game::types::{ConnectionId, PlayerName};

/// Why a join request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinRejected {
    #[error("both seats are taken")]
    Full,
    #[error("the match has already started")]
    AlreadyStarted,
    #[error("this connection already holds a seat")]
    AlreadySeated,
}

/// Live connections and their outbound mailboxes.
pub struct SessionRegistry {
    connections: HashMap<ConnectionId, Recipient<ServerWsMessage>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    pub fn register(&mut self, id: ConnectionId, addr: Recipient<ServerWsMessage>) {
        self.connections.insert(id, addr);
    }

    /// Returns false if the connection was not registered.
    pub fn unregister(&mut self, id: &ConnectionId) -> bool {
        self.connections.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn send(&self, id: &ConnectionId, msg: ServerWsMessage) {
        match self.connections.get(id) {
            Some(addr) => addr.do_send(msg),
            None => debug!("[SessionRegistry] Dropping message for unknown connection {}", id),
        }
    }

    pub fn broadcast(&self, msg: &ServerWsMessage) {
        for addr in self.connections.values() {
            addr.do_send(msg.clone());
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Seat a connection as a new player, if admission rules allow it.
pub fn seat<'a>(
    state: &'a mut MatchState,
    id: ConnectionId,
    name: PlayerName,
) -> Result<&'a Player, JoinRejected> {
    if state.seat_of(&id).is_some() {
        return Err(JoinRejected::AlreadySeated);
    }
    if state.is_full() {
        return Err(JoinRejected::Full);
    }
    // Keeps `game_winner => !started` and `started => full` intact.
    if state.started || state.game_winner.is_some() {
        return Err(JoinRejected::AlreadyStarted);
    }
    state.players.push(Player::new(id, name));
    Ok(&state.players[state.players.len() - 1])
}

/// Remove the connection's seat, if it holds one. Idempotent.
pub fn unseat(state: &mut MatchState, id: &ConnectionId) -> Option<Player> {
    let idx = state.seat_of(id)?;
    Some(state.players.remove(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn name(s: &str) -> PlayerName {
        PlayerName::parse(s).unwrap()
    }

    #[test]
    fn test_seat_appends_in_join_order() {
        let mut state = MatchState::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        seat(&mut state, a, name("Alice")).unwrap();
        let player = seat(&mut state, b, name("Bob")).unwrap();
        assert_eq!(player.id, b);
        assert_eq!(player.score, 0);
        assert!(player.choice.is_none());
        assert_eq!(state.seat_of(&a), Some(0));
        assert_eq!(state.seat_of(&b), Some(1));
    }

    #[test]
    fn test_seat_rejections() {
        let mut state = MatchState::new();
        let a = Uuid::new_v4();
        seat(&mut state, a, name("Alice")).unwrap();
        assert_eq!(seat(&mut state, a, name("Again")).unwrap_err(), JoinRejected::AlreadySeated);

        seat(&mut state, Uuid::new_v4(), name("Bob")).unwrap();
        assert_eq!(seat(&mut state, Uuid::new_v4(), name("Carol")).unwrap_err(), JoinRejected::Full);
        assert_eq!(state.players.len(), 2);
    }

    #[test]
    fn test_seat_rejected_after_completion() {
        let mut state = MatchState::new();
        let a = Uuid::new_v4();
        seat(&mut state, a, name("Alice")).unwrap();
        state.game_winner = Some(a);
        assert_eq!(
            seat(&mut state, Uuid::new_v4(), name("Bob")).unwrap_err(),
            JoinRejected::AlreadyStarted
        );
    }

    #[test]
    fn test_unseat_is_idempotent() {
        let mut state = MatchState::new();
        let a = Uuid::new_v4();
        seat(&mut state, a, name("Alice")).unwrap();
        assert_eq!(unseat(&mut state, &a).map(|p| p.id), Some(a));
        assert!(unseat(&mut state, &a).is_none());
        assert!(state.players.is_empty());
    }
}
