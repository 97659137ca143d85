//! The replay computations: pure functions over a hand's action log.
//!
//! Every function takes the replay cursor (`step`) as a parameter and is
//! stateless; callers own the cursor. `step` indexes into the log and must
//! satisfy `step < hand.action_count()` for all functions here. The
//! showdown view (`step == action_count`) reads the stored final pot and
//! winners instead and queries the board with `step - 1`, so the engine
//! itself never accepts the one-past-the-end cursor.

use thiserror::Error;

use crate::action::{Action, Move};
use crate::hand::Hand;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("step {step} out of range for a log of {len} actions")]
    OutOfRangeStep { step: usize, len: usize },
    #[error("unknown player: {0:?}")]
    UnknownPlayer(String),
}

/// What to display for a player at a given step.
///
/// "Nothing to show" and "shown as folded" are distinct states, and a real
/// move always carries its stake; the view never has to compare against
/// sentinel strings.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LastMove {
    /// Player has not acted yet, or their prior-round action is stale
    NoAction,
    /// Player is out of the hand (folded, or inactive across two rounds)
    Fold,
    /// Player's most recent action in the current round
    Move { label: Move, stake: u32 },
}

/// Zero-based betting round active at `step`: the number of round
/// boundaries at indices `0..=step`. Monotonic non-decreasing in `step`.
pub fn bet_round(hand: &Hand, step: usize) -> Result<usize, ReplayError> {
    let log = bounded(hand, step)?;
    Ok(log[..=step].iter().filter(|a| a.is_boundary()).count())
}

/// Chips committed across all completed betting rounds up to `step`.
///
/// The subtotal of the round still open at `step` is deliberately
/// excluded: the view shows it per player instead, via
/// [`stake_for_player`].
pub fn pot(hand: &Hand, step: usize) -> Result<u32, ReplayError> {
    let log = bounded(hand, step)?;
    let mut total = 0;
    let mut round_subtotal = 0;
    for action in &log[..=step] {
        match action {
            Action::Bet { stake, .. } => round_subtotal += stake,
            Action::RoundBoundary => {
                total += round_subtotal;
                round_subtotal = 0;
            }
        }
    }
    Ok(total)
}

/// Total this player has committed to the round open at `step`.
///
/// Scans backward and stops at the first boundary; stakes behind it belong
/// to an earlier round. Preflop the scan runs off the start of the log,
/// which is the normal case, not an error.
pub fn stake_for_player(hand: &Hand, player: &str, step: usize) -> Result<u32, ReplayError> {
    let log = bounded(hand, step)?;
    known_player(hand, player)?;
    let mut sum = 0;
    for action in log[..=step].iter().rev() {
        match action {
            Action::Bet {
                player: actor,
                stake,
                ..
            } => {
                if actor == player {
                    sum += stake;
                }
            }
            Action::RoundBoundary => break,
        }
    }
    Ok(sum)
}

/// Resolves the move to display for `player` as of `step`.
///
/// A player who has not acted in the current round is looked up in the
/// previous round: a real move there means nothing is shown (it is stale),
/// while a fold there, or no action there either, resolves to
/// [`LastMove::Fold`] — the player is no longer in the hand.
pub fn last_move(hand: &Hand, player: &str, step: usize) -> Result<LastMove, ReplayError> {
    let log = bounded(hand, step)?;
    known_player(hand, player)?;
    match scan_back(log, player, Some(step)) {
        Scan::Exhausted => Ok(LastMove::NoAction),
        Scan::Found {
            mv: Move::Fold, ..
        } => Ok(LastMove::Fold),
        Scan::Found { mv, stake } => Ok(LastMove::Move { label: mv, stake }),
        Scan::Boundary { index } => match scan_back(log, player, index.checked_sub(1)) {
            Scan::Exhausted | Scan::Boundary { .. } => Ok(LastMove::Fold),
            Scan::Found {
                mv: Move::Fold, ..
            } => Ok(LastMove::Fold),
            Scan::Found { .. } => Ok(LastMove::NoAction),
        },
    }
}

/// Result of one backward scan: the player's nearest bet action, or the
/// boundary that cut the scan short, or neither before the log ran out.
enum Scan {
    Found { mv: Move, stake: u32 },
    Boundary { index: usize },
    Exhausted,
}

fn scan_back(log: &[Action], player: &str, from: Option<usize>) -> Scan {
    let Some(from) = from else {
        return Scan::Exhausted;
    };
    for index in (0..=from).rev() {
        match &log[index] {
            Action::Bet {
                player: actor,
                mv,
                stake,
            } => {
                if actor == player {
                    return Scan::Found {
                        mv: *mv,
                        stake: *stake,
                    };
                }
            }
            Action::RoundBoundary => return Scan::Boundary { index },
        }
    }
    Scan::Exhausted
}

fn bounded(hand: &Hand, step: usize) -> Result<&[Action], ReplayError> {
    let len = hand.action_count();
    if step >= len {
        return Err(ReplayError::OutOfRangeStep { step, len });
    }
    Ok(&hand.history)
}

fn known_player(hand: &Hand, player: &str) -> Result<(), ReplayError> {
    if hand.has_player(player) {
        Ok(())
    } else {
        Err(ReplayError::UnknownPlayer(player.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_with(players: &[&str], history: Vec<Action>) -> Hand {
        Hand {
            id: String::new(),
            players: players.iter().map(|p| p.to_string()).collect(),
            pot_share: 0,
            winners: Vec::new(),
            pocketcards: Default::default(),
            communitycards: Vec::new(),
            history,
        }
    }

    #[test]
    fn pot_is_zero_before_the_first_boundary() {
        let hand = hand_with(&["p1"], vec![Action::bet("p1", Move::Bet, 10)]);
        assert_eq!(pot(&hand, 0), Ok(0));
    }

    #[test]
    fn step_past_the_log_fails_fast() {
        let hand = hand_with(&["p1"], vec![Action::bet("p1", Move::Bet, 10)]);
        assert_eq!(
            bet_round(&hand, 1),
            Err(ReplayError::OutOfRangeStep { step: 1, len: 1 })
        );
        assert_eq!(pot(&hand, 1), Err(ReplayError::OutOfRangeStep { step: 1, len: 1 }));
        assert_eq!(
            stake_for_player(&hand, "p1", 1),
            Err(ReplayError::OutOfRangeStep { step: 1, len: 1 })
        );
        assert_eq!(
            last_move(&hand, "p1", 1),
            Err(ReplayError::OutOfRangeStep { step: 1, len: 1 })
        );
    }

    #[test]
    fn unknown_player_is_an_error_not_a_zero() {
        let hand = hand_with(&["p1"], vec![Action::bet("p1", Move::Bet, 10)]);
        assert_eq!(
            stake_for_player(&hand, "p2", 0),
            Err(ReplayError::UnknownPlayer("p2".to_string()))
        );
        assert_eq!(
            last_move(&hand, "p2", 0),
            Err(ReplayError::UnknownPlayer("p2".to_string()))
        );
    }

    #[test]
    fn direct_move_is_reported_with_its_stake() {
        let hand = hand_with(&["p1"], vec![Action::bet("p1", Move::Bet, 10)]);
        assert_eq!(
            last_move(&hand, "p1", 0),
            Ok(LastMove::Move {
                label: Move::Bet,
                stake: 10
            })
        );
    }

    #[test]
    fn direct_fold_suppresses_the_stake() {
        let hand = hand_with(
            &["p1", "p2"],
            vec![
                Action::bet("p1", Move::Bet, 10),
                Action::bet("p2", Move::Fold, 0),
            ],
        );
        assert_eq!(last_move(&hand, "p2", 1), Ok(LastMove::Fold));
    }

    #[test]
    fn player_before_their_first_turn_has_no_action() {
        let hand = hand_with(
            &["p1", "p2"],
            vec![
                Action::bet("p1", Move::Bet, 10),
                Action::bet("p2", Move::Call, 10),
            ],
        );
        assert_eq!(last_move(&hand, "p2", 0), Ok(LastMove::NoAction));
    }

    #[test]
    fn fold_in_previous_round_resolves_to_fold() {
        // p1 folded preflop; on the flop the fallback scan finds that fold.
        let hand = hand_with(
            &["p1", "p2"],
            vec![
                Action::bet("p1", Move::Fold, 0),
                Action::bet("p2", Move::Bet, 10),
                Action::RoundBoundary,
                Action::bet("p2", Move::Bet, 10),
            ],
        );
        assert_eq!(last_move(&hand, "p1", 3), Ok(LastMove::Fold));
    }

    #[test]
    fn boundary_at_index_zero_exhausts_the_fallback_scan() {
        let hand = hand_with(
            &["p1", "p2"],
            vec![Action::RoundBoundary, Action::bet("p2", Move::Bet, 10)],
        );
        assert_eq!(last_move(&hand, "p1", 1), Ok(LastMove::Fold));
    }

    #[test]
    fn stake_counts_only_the_open_round() {
        let hand = hand_with(
            &["p1", "p2"],
            vec![
                Action::bet("p1", Move::Bet, 10),
                Action::bet("p2", Move::Call, 10),
                Action::RoundBoundary,
                Action::bet("p1", Move::Bet, 20),
            ],
        );
        assert_eq!(stake_for_player(&hand, "p1", 3), Ok(20));
        assert_eq!(stake_for_player(&hand, "p2", 3), Ok(0));
    }

    #[test]
    fn replay_functions_are_pure() {
        let hand = hand_with(
            &["p1", "p2"],
            vec![
                Action::bet("p1", Move::Bet, 10),
                Action::RoundBoundary,
                Action::bet("p2", Move::Bet, 20),
            ],
        );
        for step in 0..hand.action_count() {
            assert_eq!(bet_round(&hand, step), bet_round(&hand, step));
            assert_eq!(pot(&hand, step), pot(&hand, step));
            assert_eq!(
                stake_for_player(&hand, "p1", step),
                stake_for_player(&hand, "p1", step)
            );
            assert_eq!(
                last_move(&hand, "p2", step),
                last_move(&hand, "p2", step)
            );
        }
    }
}
