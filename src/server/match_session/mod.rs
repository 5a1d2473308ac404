//! Match session: the one concurrent two-player match.
//!
//! `machine` holds the transitions, `server` is the actor that owns the machine
//! and schedules deferred round transitions, `session` is the per-connection
//! WebSocket actor, `registry` tracks connections and seats, and `messages`
//! is the wire and actor message contract.

pub mod machine;
pub mod messages;
pub mod registry;
pub mod server;
pub mod session;

pub use server::MatchServer;
