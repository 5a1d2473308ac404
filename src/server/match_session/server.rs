//! Match server actor.
//!
//! Single writer for the match: every connect, disconnect and client command is
//! an actor message, handled to completion (broadcasts included) before the
//! next one. Also runs the round transition scheduler.

use std::time::Duration;

use actix::prelude::*;
use log::{debug, info, warn};

use super::machine::{MatchMachine, Outcome, Target};
use super::messages::{ClientCommand, Connect, Disconnect, GetMatchState, MatchCommand, ServerWsMessage};
use super::registry::SessionRegistry;
use crate::config::game::NEXT_ROUND_DELAY_SECS;

/// Handle for an armed next-round timer.
struct PendingRound {
    handle: SpawnHandle,
    epoch: u64,
}

pub struct MatchServer {
    machine: MatchMachine,
    registry: SessionRegistry,
    next_round: Option<PendingRound>,
    next_round_delay: Duration,
}

impl MatchServer {
    pub fn new() -> Self {
        Self::with_delay(Duration::from_secs(NEXT_ROUND_DELAY_SECS))
    }

    pub fn with_delay(next_round_delay: Duration) -> Self {
        Self {
            machine: MatchMachine::new(),
            registry: SessionRegistry::new(),
            next_round: None,
            next_round_delay,
        }
    }

    /// Deliver the outcome of a transition and arm the next round if asked.
    fn apply(&mut self, outcome: Outcome, ctx: &mut Context<Self>) {
        for dispatch in outcome.dispatches {
            match dispatch.target {
                Target::All => self.registry.broadcast(&dispatch.message),
                Target::Connection(id) => self.registry.send(&id, dispatch.message),
            }
        }
        if let Some(epoch) = outcome.schedule {
            self.schedule_next_round(epoch, ctx);
        }
    }

    fn schedule_next_round(&mut self, epoch: u64, ctx: &mut Context<Self>) {
        self.cancel_next_round(ctx);
        let handle = ctx.run_later(self.next_round_delay, move |act, ctx| {
            act.next_round = None;
            match act.machine.advance_round(epoch) {
                Some(outcome) => act.apply(outcome, ctx),
                None => debug!("[MatchServer] Next-round timer for epoch {} suppressed", epoch),
            }
        });
        self.next_round = Some(PendingRound { handle, epoch });
        debug!("[MatchServer] Next round in {:?} (epoch {})", self.next_round_delay, epoch);
    }

    fn cancel_next_round(&mut self, ctx: &mut Context<Self>) {
        if let Some(pending) = self.next_round.take() {
            ctx.cancel_future(pending.handle);
            debug!("[MatchServer] Next-round timer cancelled (epoch {})", pending.epoch);
        }
    }

    /// Drop a pending timer that belongs to a match instance that no longer exists.
    fn drop_stale_timer(&mut self, ctx: &mut Context<Self>) {
        let current = self.machine.epoch();
        if self.next_round.as_ref().is_some_and(|p| p.epoch != current) {
            self.cancel_next_round(ctx);
        }
    }
}

impl Default for MatchServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for MatchServer {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("[MatchServer] Ready, next-round delay {:?}", self.next_round_delay);
    }
}

impl Handler<Connect> for MatchServer {
    type Result = ();

    fn handle(&mut self, msg: Connect, ctx: &mut Context<Self>) -> Self::Result {
        self.registry.register(msg.id, msg.addr);
        info!("[MatchServer] Connection {} opened ({} live)", msg.id, self.registry.len());
        let snapshot = self.machine.snapshot(msg.id);
        self.apply(snapshot, ctx);
    }
}

impl Handler<Disconnect> for MatchServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, ctx: &mut Context<Self>) -> Self::Result {
        if !self.registry.unregister(&msg.id) {
            debug!("[MatchServer] Disconnect for unknown connection {}", msg.id);
        }
        info!("[MatchServer] Connection {} closed ({} live)", msg.id, self.registry.len());
        let outcome = self.machine.leave(&msg.id);
        self.drop_stale_timer(ctx);
        self.apply(outcome, ctx);
    }
}

impl Handler<ClientCommand> for MatchServer {
    type Result = ();

    fn handle(&mut self, msg: ClientCommand, ctx: &mut Context<Self>) -> Self::Result {
        let outcome = match msg.command {
            MatchCommand::Join(name) => match self.machine.join(msg.id, name) {
                Ok(outcome) => outcome,
                Err(reason) => {
                    warn!("[MatchServer] Join from {} rejected: {}", msg.id, reason);
                    self.registry.send(&msg.id, ServerWsMessage::JoinRejected { reason });
                    return;
                }
            },
            MatchCommand::Choose(choice) => self.machine.submit_choice(msg.id, choice),
            MatchCommand::Reset => {
                info!("[MatchServer] Reset requested by {}", msg.id);
                self.machine.reset()
            }
        };
        self.drop_stale_timer(ctx);
        self.apply(outcome, ctx);
    }
}

impl Handler<GetMatchState> for MatchServer {
    type Result = MessageResult<GetMatchState>;

    fn handle(&mut self, _msg: GetMatchState, _ctx: &mut Context<Self>) -> Self::Result {
        MessageResult(self.machine.state().clone())
    }
}
