use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

use crate::config::game::MAX_NAME_LEN;

/// Identifier of a live WebSocket connection. A seated connection uses the
/// same value as its player id.
pub type ConnectionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    #[cfg(test)]
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// The choice this one defeats.
    pub fn beats(self) -> Choice {
        match self {
            Choice::Rock => Choice::Scissors,
            Choice::Paper => Choice::Rock,
            Choice::Scissors => Choice::Paper,
        }
    }
}

/// Outcome of comparing two choices, seen from the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Tie,
    FirstWins,
    SecondWins,
}

impl Verdict {
    /// Same comparison with the arguments swapped.
    #[cfg(test)]
    pub fn mirror(self) -> Verdict {
        match self {
            Verdict::Tie => Verdict::Tie,
            Verdict::FirstWins => Verdict::SecondWins,
            Verdict::SecondWins => Verdict::FirstWins,
        }
    }
}

/// Winner of a single round: either a tie or the id of the winning player.
///
/// Serialized as the string `"tie"` or the player's id, which is what the
/// clients compare against their own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundWinner {
    Tie,
    Player(ConnectionId),
}

impl Serialize for RoundWinner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RoundWinner::Tie => serializer.serialize_str("tie"),
            RoundWinner::Player(id) => id.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("player name must not be empty")]
    Empty,
    #[error("player name must be at most {max} characters (got {0})", max = MAX_NAME_LEN)]
    TooLong(usize),
}

/// A player name that passed server-side validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let name = raw.trim();
        let len = name.chars().count();
        if len == 0 {
            return Err(NameError::Empty);
        }
        if len > MAX_NAME_LEN {
            return Err(NameError::TooLong(len));
        }
        Ok(Self(name.to_string()))
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        let name = PlayerName::parse("  Alice ").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_name_length_bounds() {
        assert_eq!(PlayerName::parse(""), Err(NameError::Empty));
        assert_eq!(PlayerName::parse("   "), Err(NameError::Empty));
        assert!(PlayerName::parse("a").is_ok());
        assert!(PlayerName::parse(&"x".repeat(15)).is_ok());
        assert_eq!(PlayerName::parse(&"x".repeat(16)), Err(NameError::TooLong(16)));
    }

    #[test]
    fn test_name_counts_characters_not_bytes() {
        // 15 two-byte characters.
        assert!(PlayerName::parse(&"é".repeat(15)).is_ok());
    }

    #[test]
    fn test_round_winner_wire_format() {
        let id = Uuid::new_v4();
        assert_eq!(serde_json::to_value(RoundWinner::Tie).unwrap(), "tie");
        assert_eq!(
            serde_json::to_value(RoundWinner::Player(id)).unwrap(),
            serde_json::Value::String(id.to_string())
        );
    }

    #[test]
    fn test_choice_wire_format() {
        assert_eq!(serde_json::to_value(Choice::Scissors).unwrap(), "scissors");
        let parsed: Choice = serde_json::from_str("\"rock\"").unwrap();
        assert_eq!(parsed, Choice::Rock);
        assert!(serde_json::from_str::<Choice>("\"lizard\"").is_err());
    }
}
