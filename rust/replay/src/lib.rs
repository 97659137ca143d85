//! # railbird-replay: Hand History Replay Engine Core
//!
//! A pure replay engine for completed Texas Hold'em hand histories.
//! Given an immutable, ordered action log and a replay cursor, it derives
//! the pot, the per-player current-round stakes, the active betting round,
//! and the move to display for each player. All computations are stateless
//! and synchronous; the cursor is owned by the caller.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card labels (`"As"`, `"10h"`) parsed into rank and suit
//! - [`action`] - Betting moves, bet actions and round-boundary markers
//! - [`street`] - Betting streets and community-card reveal counts
//! - [`hand`] - The hand history document and its structural validation
//! - [`replay`] - The replay computations over an action log
//!
//! ## Quick Start
//!
//! ```rust
//! use railbird_replay::action::{Action, Move};
//! use railbird_replay::hand::Hand;
//! use railbird_replay::replay::{self, LastMove};
//!
//! let hand = Hand {
//!     id: "demo-0:0000000001".to_string(),
//!     players: vec!["alice".to_string(), "bob".to_string()],
//!     pot_share: 20,
//!     winners: vec!["alice".to_string()],
//!     pocketcards: Default::default(),
//!     communitycards: vec!["2c".to_string(), "9d".to_string(), "Kh".to_string()],
//!     history: vec![
//!         Action::bet("alice", Move::Bet, 10),
//!         Action::bet("bob", Move::Call, 10),
//!         Action::RoundBoundary,
//!         Action::bet("alice", Move::Check, 0),
//!     ],
//! };
//!
//! // Preflop stakes are complete once the boundary is crossed.
//! assert_eq!(replay::pot(&hand, 3).unwrap(), 20);
//! assert_eq!(
//!     replay::last_move(&hand, "alice", 3).unwrap(),
//!     LastMove::Move { label: Move::Check, stake: 0 },
//! );
//! ```

pub mod action;
pub mod cards;
pub mod hand;
pub mod replay;
pub mod street;
