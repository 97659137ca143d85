//! Betting scenarios replayed end to end against recorded hand documents.

use railbird_replay::action::{Action, Move};
use railbird_replay::hand::Hand;
use railbird_replay::replay::{bet_round, last_move, pot, stake_for_player, LastMove};

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

/// A full four-round hand between stefan, hugop and steven. Boundaries sit
/// at indices 5, 8 and 11.
fn three_handed_hand() -> Hand {
    hand_with(
        &["stefan", "hugop", "steven"],
        vec![
            Action::bet("stefan", Move::Bet, 10),
            Action::bet("hugop", Move::Call, 20),
            Action::bet("steven", Move::Call, 20),
            Action::bet("stefan", Move::Raise, 30),
            Action::bet("steven", Move::Call, 20),
            Action::RoundBoundary,
            Action::bet("stefan", Move::Bet, 20),
            Action::bet("steven", Move::Call, 20),
            Action::RoundBoundary,
            Action::bet("stefan", Move::Bet, 40),
            Action::bet("steven", Move::Call, 40),
            Action::RoundBoundary,
            Action::bet("stefan", Move::Bet, 40),
            Action::bet("steven", Move::Call, 40),
        ],
    )
}

#[test]
fn pot_accumulates_only_completed_rounds() {
    let hand = three_handed_hand();
    for step in 0..=4 {
        assert_eq!(pot(&hand, step), Ok(0), "step {step}");
    }
    for step in 5..=7 {
        assert_eq!(pot(&hand, step), Ok(100), "step {step}");
    }
    for step in 8..=10 {
        assert_eq!(pot(&hand, step), Ok(140), "step {step}");
    }
    for step in 11..=13 {
        assert_eq!(pot(&hand, step), Ok(220), "step {step}");
    }
}

#[test]
fn pot_never_decreases_as_the_cursor_advances() {
    let hand = three_handed_hand();
    let mut previous = 0;
    for step in 0..hand.action_count() {
        let current = pot(&hand, step).expect("pot");
        assert!(current >= previous, "pot shrank at step {step}");
        previous = current;
    }
}

#[test]
fn stake_for_player_tracks_the_open_round() {
    let hand = three_handed_hand();
    assert_eq!(stake_for_player(&hand, "steven", 0), Ok(0));
    assert_eq!(stake_for_player(&hand, "steven", 4), Ok(40));
    // Fresh round after a boundary: preflop stakes no longer count.
    assert_eq!(stake_for_player(&hand, "steven", 5), Ok(0));
    assert_eq!(stake_for_player(&hand, "steven", 7), Ok(20));
}

#[test]
fn round_stakes_reconcile_with_the_pot() {
    // Summing every player's stake just before a boundary gives exactly
    // the subtotal the pot absorbs when that boundary is crossed.
    let hand = three_handed_hand();
    let boundaries = [5usize, 8, 11];
    let mut expected_pot = 0;
    for &boundary in &boundaries {
        let per_player: u32 = hand
            .players
            .iter()
            .map(|p| stake_for_player(&hand, p, boundary - 1).expect("stake"))
            .sum();
        expected_pot += per_player;
        assert_eq!(pot(&hand, boundary), Ok(expected_pot));
    }
}

#[test]
fn bet_round_counts_boundaries_inclusively() {
    let hand = hand_with(
        &["p1", "p2"],
        vec![
            Action::bet("p1", Move::Bet, 10),
            Action::bet("p2", Move::Call, 10),
            Action::RoundBoundary,
            Action::bet("p1", Move::Check, 0),
            Action::bet("p2", Move::Check, 0),
            Action::RoundBoundary,
            Action::bet("p1", Move::Bet, 20),
            Action::bet("p2", Move::Call, 20),
            Action::RoundBoundary,
        ],
    );
    let expected = [0, 0, 1, 1, 1, 2, 2, 2, 3];
    for (step, want) in expected.iter().enumerate() {
        assert_eq!(bet_round(&hand, step), Ok(*want), "step {step}");
    }
}

#[test]
fn bet_round_is_monotonic() {
    let hand = three_handed_hand();
    let mut previous = 0;
    for step in 0..hand.action_count() {
        let current = bet_round(&hand, step).expect("round");
        assert!(current >= previous, "round went backward at step {step}");
        previous = current;
    }
}

#[test]
fn player_idle_for_a_full_round_is_shown_as_folded() {
    let hand = hand_with(
        &["p1", "p2"],
        vec![
            Action::bet("p1", Move::Check, 10),
            Action::RoundBoundary,
            Action::bet("p2", Move::Bet, 10),
            Action::RoundBoundary,
            Action::bet("p2", Move::Bet, 10),
        ],
    );
    // At step 2 p1's check is one round back: stale, nothing shown.
    assert_eq!(last_move(&hand, "p1", 2), Ok(LastMove::NoAction));
    // At step 4 p1 has been silent for the whole previous round too.
    assert_eq!(last_move(&hand, "p1", 4), Ok(LastMove::Fold));
}

#[test]
fn single_action_log_resolves_directly() {
    let hand = hand_with(&["p1", "p2"], vec![Action::bet("p1", Move::Bet, 10)]);
    assert_eq!(
        last_move(&hand, "p1", 0),
        Ok(LastMove::Move {
            label: Move::Bet,
            stake: 10
        })
    );
    // p2 is seated but has not acted yet.
    assert_eq!(last_move(&hand, "p2", 0), Ok(LastMove::NoAction));
}
