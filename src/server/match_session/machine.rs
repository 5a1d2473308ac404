//! Match state machine.
//!
//! Owns the [`MatchState`] and implements every transition of the match:
//! joining, choice submission and round resolution, disconnect aborts, resets,
//! and the deferred next-round step. Transitions never touch the network; each
//! returns an [`Outcome`] describing what to send and whether a next-round
//! transition must be armed. The owning actor applies it.

use log::{debug, info};

use super::messages::{RoundResult, ServerWsMessage};
use super::registry::{self, JoinRejected};
use crate::config::game::WINNING_SCORE;
use crate::game::resolver::resolve;
use crate::game::state::{MatchState, Phase};
use crate::game::types::{Choice, ConnectionId, PlayerName, RoundWinner, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    All,
    Connection(ConnectionId),
}

#[derive(Debug, Clone)]
pub struct Dispatch {
    pub target: Target,
    pub message: ServerWsMessage,
}

/// Side effects requested by a transition.
#[derive(Debug, Default)]
pub struct Outcome {
    pub dispatches: Vec<Dispatch>,
    /// Epoch to arm a next-round transition against.
    pub schedule: Option<u64>,
}

impl Outcome {
    fn broadcast(mut self, message: ServerWsMessage) -> Self {
        self.dispatches.push(Dispatch {
            target: Target::All,
            message,
        });
        self
    }

    fn unicast(mut self, id: ConnectionId, message: ServerWsMessage) -> Self {
        self.dispatches.push(Dispatch {
            target: Target::Connection(id),
            message,
        });
        self
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.dispatches.is_empty() && self.schedule.is_none()
    }

    #[cfg(test)]
    pub fn messages(&self) -> impl Iterator<Item = &ServerWsMessage> {
        self.dispatches.iter().map(|d| &d.message)
    }
}

pub struct MatchMachine {
    state: MatchState,
}

impl MatchMachine {
    pub fn new() -> Self {
        Self {
            state: MatchState::new(),
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn epoch(&self) -> u64 {
        self.state.epoch
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Full state, for a newly connected client only.
    pub fn snapshot(&self, to: ConnectionId) -> Outcome {
        Outcome::default().unicast(to, ServerWsMessage::StateSnapshot(self.state.clone()))
    }

    pub fn join(&mut self, id: ConnectionId, name: PlayerName) -> Result<Outcome, JoinRejected> {
        let player = registry::seat(&mut self.state, id, name)?.clone();
        info!("[MatchMachine] {} joined as {} (seat {})", id, player.name, self.state.players.len());

        let mut outcome = Outcome::default().broadcast(ServerWsMessage::PlayerJoined {
            player,
            total_players: self.state.players.len(),
        });
        if self.state.is_full() {
            self.state.started = true;
            info!("[MatchMachine] Match started (epoch {})", self.state.epoch);
            outcome = outcome.broadcast(ServerWsMessage::MatchStart);
        }
        self.check_invariants();
        Ok(outcome)
    }

    /// Record a choice. A player may change it until the opponent has chosen;
    /// the round resolves the instant the second choice lands.
    pub fn submit_choice(&mut self, id: ConnectionId, choice: Choice) -> Outcome {
        if self.state.phase() != Phase::Active {
            debug!("[MatchMachine] Ignoring choice from {}: phase is {:?}", id, self.state.phase());
            return Outcome::default();
        }
        let Some(seat) = self.state.seat_of(&id) else {
            debug!("[MatchMachine] Ignoring choice from unseated connection {}", id);
            return Outcome::default();
        };
        if let Some(previous) = self.state.players[seat].choice.replace(choice) {
            debug!("[MatchMachine] {} changed choice {:?} -> {:?}", id, previous, choice);
        }

        if self.state.phase() == Phase::RoundResolving {
            self.resolve_round()
        } else {
            Outcome::default()
        }
    }

    fn resolve_round(&mut self) -> Outcome {
        let [first, second] = &mut self.state.players[..] else {
            return Outcome::default();
        };
        let (Some(first_choice), Some(second_choice)) = (first.choice, second.choice) else {
            return Outcome::default();
        };

        let round_winner = match resolve(first_choice, second_choice) {
            Verdict::Tie => RoundWinner::Tie,
            Verdict::FirstWins => {
                first.score += 1;
                RoundWinner::Player(first.id)
            }
            Verdict::SecondWins => {
                second.score += 1;
                RoundWinner::Player(second.id)
            }
        };
        let match_winner = [&*first, &*second]
            .into_iter()
            .find(|p| p.score >= WINNING_SCORE)
            .map(|p| p.id);

        self.state.current_round += 1;
        self.state.round_winner = Some(round_winner);
        if let Some(winner) = match_winner {
            self.state.game_winner = Some(winner);
            self.state.started = false;
            info!("[MatchMachine] Match won by {} after {} rounds", winner, self.state.current_round);
        } else {
            info!("[MatchMachine] Round {} resolved: {:?}", self.state.current_round, round_winner);
        }
        self.check_invariants();

        let outcome = Outcome::default().broadcast(ServerWsMessage::RoundResult(RoundResult {
            player1_choice: first_choice,
            player2_choice: second_choice,
            round_winner,
            scores: self.state.scores(),
            game_winner: self.state.game_winner,
            current_round: self.state.current_round,
        }));
        if self.state.game_winner.is_some() {
            outcome
        } else {
            Outcome {
                schedule: Some(self.state.epoch),
                ..outcome
            }
        }
    }

    /// Deferred transition to the next round. Returns `None` when the timer is
    /// stale: armed against an older epoch, or the round it belongs to is gone.
    pub fn advance_round(&mut self, epoch: u64) -> Option<Outcome> {
        if epoch != self.state.epoch {
            debug!("[MatchMachine] Stale next-round (epoch {} != {})", epoch, self.state.epoch);
            return None;
        }
        if self.state.phase() != Phase::RoundResolving {
            debug!("[MatchMachine] Next-round skipped: phase is {:?}", self.state.phase());
            return None;
        }
        self.state.clear_choices();
        self.state.round_winner = None;
        debug!("[MatchMachine] Round {} begins", self.state.current_round + 1);
        Some(Outcome::default().broadcast(ServerWsMessage::NextRound))
    }

    /// Disconnect cleanup. A seated player leaving aborts the match back to
    /// waiting; the remaining player keeps the seat but starts from scratch.
    /// Every disconnect is announced, seated or not.
    pub fn leave(&mut self, id: &ConnectionId) -> Outcome {
        let Some(player) = registry::unseat(&mut self.state, id) else {
            debug!("[MatchMachine] Unseated connection {} left", id);
            return self.announce_left(id);
        };
        let was_in_progress = self.state.started || self.state.current_round > 0;

        self.state.started = false;
        self.state.current_round = 0;
        self.state.round_winner = None;
        self.state.game_winner = None;
        for remaining in &mut self.state.players {
            remaining.choice = None;
            remaining.score = 0;
        }
        self.state.epoch += 1;
        self.check_invariants();

        if was_in_progress {
            info!("[MatchMachine] {} ({}) left, match aborted", id, player.name);
        } else {
            info!("[MatchMachine] {} ({}) left", id, player.name);
        }
        self.announce_left(id)
    }

    fn announce_left(&self, id: &ConnectionId) -> Outcome {
        Outcome::default().broadcast(ServerWsMessage::PlayerLeft {
            player_id: *id,
            remaining_players: self.state.players.len(),
        })
    }

    /// Replace the match wholesale and move to a new epoch.
    pub fn reset(&mut self) -> Outcome {
        self.state = MatchState::with_epoch(self.state.epoch + 1);
        info!("[MatchMachine] Match reset (epoch {})", self.state.epoch);
        Outcome::default().broadcast(ServerWsMessage::MatchReset)
    }

    fn check_invariants(&self) {
        debug_assert!(self.state.invariants_hold(), "match invariants violated: {:?}", self.state);
    }
}

impl Default for MatchMachine {
    fn default() -> Self {
        Self::new()
    }
}
