use serde::{Deserialize, Serialize};

/// Represents a betting street in Texas Hold'em poker.
///
/// Streets correspond to the zero-based betting round indices produced by
/// [`crate::replay::bet_round`]: the round advances each time a boundary
/// marker is crossed in the action log.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    /// Before the flop (hole cards only)
    Preflop,
    /// After the flop (3 community cards)
    Flop,
    /// After the turn (4th community card)
    Turn,
    /// After the river (5th community card)
    River,
}

impl Street {
    /// Street for a zero-based betting round index. `None` past the river,
    /// which only happens for a log with too many boundary markers.
    pub fn from_round(round: usize) -> Option<Street> {
        match round {
            0 => Some(Street::Preflop),
            1 => Some(Street::Flop),
            2 => Some(Street::Turn),
            3 => Some(Street::River),
            _ => None,
        }
    }

    pub fn round(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 1,
            Street::Turn => 2,
            Street::River => 3,
        }
    }

    /// How many community cards are face up on this street.
    pub fn revealed_cards(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_map_to_streets() {
        assert_eq!(Street::from_round(0), Some(Street::Preflop));
        assert_eq!(Street::from_round(1), Some(Street::Flop));
        assert_eq!(Street::from_round(2), Some(Street::Turn));
        assert_eq!(Street::from_round(3), Some(Street::River));
        assert_eq!(Street::from_round(4), None);
    }

    #[test]
    fn reveal_counts_follow_the_board() {
        assert_eq!(Street::Preflop.revealed_cards(), 0);
        assert_eq!(Street::Flop.revealed_cards(), 3);
        assert_eq!(Street::Turn.revealed_cards(), 4);
        assert_eq!(Street::River.revealed_cards(), 5);
    }

    #[test]
    fn round_is_inverse_of_from_round() {
        for round in 0..4 {
            assert_eq!(Street::from_round(round).unwrap().round(), round);
        }
    }
}
