use std::collections::HashMap;

use serde::Serialize;

use crate::config::game::{MAX_PLAYERS, WINNING_SCORE};
use crate::game::types::{Choice, ConnectionId, PlayerName, RoundWinner};

#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub id: ConnectionId,
    pub name: PlayerName,
    pub choice: Option<Choice>,
    pub score: u8,
}

impl Player {
    pub fn new(id: ConnectionId, name: PlayerName) -> Self {
        Self {
            id,
            name,
            choice: None,
            score: 0,
        }
    }
}

/// Where the match stands, derived from [`MatchState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Zero or one player seated, or a seat was vacated mid-match.
    Waiting,
    /// Both seats taken, at least one choice still missing.
    Active,
    /// Both choices are in and the round has been scored; the next round is pending.
    RoundResolving,
    /// A player reached the winning score. Terminal until reset.
    Complete,
}

/// Single source of truth for the match. Serialized as the state snapshot
/// sent to newly connected clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    /// Join order; index 0 is player 1.
    pub players: Vec<Player>,
    pub current_round: u32,
    pub started: bool,
    pub round_winner: Option<RoundWinner>,
    pub game_winner: Option<ConnectionId>,
    /// Bumped whenever the match instance is replaced or aborted, so that
    /// deferred transitions armed against an older instance can be told apart.
    #[serde(skip)]
    pub epoch: u64,
}

impl MatchState {
    pub fn new() -> Self {
        Self::with_epoch(0)
    }

    /// Fresh, empty match tagged with the given epoch.
    pub fn with_epoch(epoch: u64) -> Self {
        Self {
            players: Vec::with_capacity(MAX_PLAYERS),
            current_round: 0,
            started: false,
            round_winner: None,
            game_winner: None,
            epoch,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.game_winner.is_some() {
            Phase::Complete
        } else if !self.started {
            Phase::Waiting
        } else if self.players.iter().all(|p| p.choice.is_some()) {
            Phase::RoundResolving
        } else {
            Phase::Active
        }
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    /// Seat index (0 or 1) of the given connection, if it holds one.
    pub fn seat_of(&self, id: &ConnectionId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    pub fn scores(&self) -> HashMap<ConnectionId, u8> {
        self.players.iter().map(|p| (p.id, p.score)).collect()
    }

    pub fn clear_choices(&mut self) {
        for player in &mut self.players {
            player.choice = None;
        }
    }

    /// Check the structural invariants of the match. Used by debug assertions
    /// after every transition and by tests.
    pub fn invariants_hold(&self) -> bool {
        let seats_ok = self.players.len() <= MAX_PLAYERS;
        let started_ok = !self.started || self.players.len() == MAX_PLAYERS;
        let winner_ok = self.game_winner.is_none() || !self.started;
        let scores_ok = self.players.iter().all(|p| p.score <= WINNING_SCORE);
        let single_winner = self
            .players
            .iter()
            .filter(|p| p.score == WINNING_SCORE)
            .count()
            <= 1;
        seats_ok && started_ok && winner_ok && scores_ok && single_winner
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn seated(n: usize) -> MatchState {
        let mut state = MatchState::new();
        for i in 0..n {
            let name = PlayerName::parse(&format!("P{i}")).unwrap();
            state.players.push(Player::new(Uuid::new_v4(), name));
        }
        state
    }

    #[test]
    fn test_new_state_is_waiting() {
        let state = MatchState::new();
        assert_eq!(state.phase(), Phase::Waiting);
        assert!(state.invariants_hold());
        assert!(!state.is_full());
    }

    #[test]
    fn test_phase_follows_choices() {
        let mut state = seated(2);
        state.started = true;
        assert_eq!(state.phase(), Phase::Active);

        state.players[0].choice = Some(Choice::Rock);
        assert_eq!(state.phase(), Phase::Active);

        state.players[1].choice = Some(Choice::Paper);
        assert_eq!(state.phase(), Phase::RoundResolving);

        state.clear_choices();
        assert_eq!(state.phase(), Phase::Active);
    }

    #[test]
    fn test_started_with_one_player_breaks_invariants() {
        let mut state = seated(1);
        state.started = true;
        assert!(!state.invariants_hold());
    }

    #[test]
    fn test_snapshot_hides_epoch() {
        let state = MatchState::with_epoch(7);
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("epoch").is_none());
        assert_eq!(json["currentRound"], 0);
        assert_eq!(json["started"], false);
        assert!(json["roundWinner"].is_null());
    }
}
