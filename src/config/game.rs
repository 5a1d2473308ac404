/// Match configuration constants.
///
/// This module defines the gameplay parameters: seat count, score needed to
/// win the match, player name limits and the pause between rounds.
pub const MAX_PLAYERS: usize = 2;

/// Score a player must reach to win the best-of-three match.
pub const WINNING_SCORE: u8 = 2;

/// Maximum length of a player name, in characters, after trimming.
pub const MAX_NAME_LEN: usize = 15;

/// Delay (in seconds) between a round result and the next round.
pub const NEXT_ROUND_DELAY_SECS: u64 = 3;
