use serde::{Deserialize, Serialize};

/// A betting move as recorded in a hand history.
///
/// Labels are stored uppercase in the documents; folds are special-cased
/// throughout the replay (stakes are suppressed for folded players).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Move {
    Check,
    Call,
    Raise,
    Bet,
    Fold,
}

impl Move {
    /// Display label, identical to the stored form.
    pub fn label(self) -> &'static str {
        match self {
            Move::Check => "CHECK",
            Move::Call => "CALL",
            Move::Raise => "RAISE",
            Move::Bet => "BET",
            Move::Fold => "FOLD",
        }
    }
}

/// One entry of a hand's action log.
///
/// The wire format is the archive document layout, tagged on `info`:
/// `{"info": "bet", "player": …, "bet": …, "stake": …}` for a bet and
/// `{"info": "next_bet_round"}` for a round boundary. Anything else fails
/// deserialization at the archive boundary.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "info")]
pub enum Action {
    #[serde(rename = "bet")]
    Bet {
        player: String,
        #[serde(rename = "bet")]
        mv: Move,
        stake: u32,
    },
    #[serde(rename = "next_bet_round")]
    RoundBoundary,
}

impl Action {
    pub fn bet(player: impl Into<String>, mv: Move, stake: u32) -> Action {
        Action::Bet {
            player: player.into(),
            mv,
            stake,
        }
    }

    pub fn is_bet(&self) -> bool {
        matches!(self, Action::Bet { .. })
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, Action::RoundBoundary)
    }

    /// Whether this is a bet action by the named player.
    pub fn is_for_player(&self, name: &str) -> bool {
        matches!(self, Action::Bet { player, .. } if player == name)
    }
}
