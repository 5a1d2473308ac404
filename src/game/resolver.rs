use crate::game::types::{Choice, Verdict};

/// Compare two choices: rock beats scissors, scissors beats paper, paper beats
/// rock, equal choices tie.
pub fn resolve(first: Choice, second: Choice) -> Verdict {
    if first == second {
        Verdict::Tie
    } else if first.beats() == second {
        Verdict::FirstWins
    } else {
        Verdict::SecondWins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Choice::*;

    #[test]
    fn test_equal_choices_tie() {
        for c in Choice::ALL {
            assert_eq!(resolve(c, c), Verdict::Tie);
        }
    }

    #[test]
    fn test_rules() {
        assert_eq!(resolve(Rock, Scissors), Verdict::FirstWins);
        assert_eq!(resolve(Scissors, Rock), Verdict::SecondWins);
        assert_eq!(resolve(Scissors, Paper), Verdict::FirstWins);
        assert_eq!(resolve(Paper, Rock), Verdict::FirstWins);
        assert_eq!(resolve(Rock, Paper), Verdict::SecondWins);
    }

    #[test]
    fn test_table_is_mirror_consistent() {
        for a in Choice::ALL {
            for b in Choice::ALL {
                assert_eq!(resolve(a, b), resolve(b, a).mirror(), "{a:?} vs {b:?}");
            }
        }
    }
}
