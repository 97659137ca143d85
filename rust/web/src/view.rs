//! Rendering adapter: turns replay engine output into the table view the
//! frontend draws. Everything here is a pure function of `(hand, step)`.

use std::collections::VecDeque;

use railbird_replay::action::Action;
use railbird_replay::cards::{Card, CardError};
use railbird_replay::hand::Hand;
use railbird_replay::replay::{self, LastMove, ReplayError};
use railbird_replay::street::Street;
use serde::Serialize;
use thiserror::Error;

/// Seats drawn around the table; unused ones are rendered empty.
pub const SEAT_COUNT: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("bad card label in stored hand: {0}")]
    Card(#[from] CardError),
    #[error("round {0} has no street; hand document has too many boundaries")]
    TooManyRounds(usize),
}

impl crate::errors::IntoErrorResponse for ViewError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            ViewError::Replay(ReplayError::OutOfRangeStep { .. }) => StatusCode::BAD_REQUEST,
            // A player or card the engine rejects means the stored document
            // is inconsistent, not that the client asked badly.
            ViewError::Replay(ReplayError::UnknownPlayer(_))
            | ViewError::Card(_)
            | ViewError::TooManyRounds(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ViewError::Replay(ReplayError::OutOfRangeStep { .. }) => "step_out_of_range",
            ViewError::Replay(ReplayError::UnknownPlayer(_)) => "inconsistent_hand",
            ViewError::Card(_) => "bad_card_label",
            ViewError::TooManyRounds(_) => "too_many_rounds",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }
}

/// A card as the frontend wants it: rank text plus a suit CSS class.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CardView {
    pub rank: String,
    pub suit: &'static str,
}

impl From<Card> for CardView {
    fn from(card: Card) -> Self {
        Self {
            rank: card.rank,
            suit: card.suit.name(),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum Badge {
    Dealer,
    Winner,
}

/// One seat at the table. Empty seats carry an empty name and nothing else.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SeatView {
    pub name: String,
    /// Move label to show, absent when the player has nothing to display
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    pub move_label: Option<&'static str>,
    /// Current-round stake, suppressed for folded players and empty seats
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stake: Option<u32>,
    pub cards: Vec<CardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    pub current: bool,
}

impl SeatView {
    fn empty() -> Self {
        Self {
            name: String::new(),
            move_label: None,
            stake: None,
            cards: Vec::new(),
            badge: None,
            current: false,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TableView {
    pub pot: u32,
    pub community_cards: Vec<CardView>,
    pub seats: Vec<SeatView>,
}

/// What a replay step resolves to.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ReplayOutcome {
    /// Mid-hand view at `step`
    Step(TableView),
    /// `step == action_count`: final pot, winners, full reveal
    Showdown(TableView),
    /// `step` ran past the log; the caller moves on to the next hand
    Advance,
}

/// Seating order for display: rotate the table order until the
/// alphabetically first player sits in seat 0. Recomputed per request, so
/// no seating state lives in the server.
pub fn seat_order(players: &[String]) -> Vec<String> {
    let mut sorted = players.to_vec();
    sorted.sort();
    let mut rotated: VecDeque<String> = players.iter().cloned().collect();
    if let Some(first) = sorted.first() {
        while rotated.front() != Some(first) {
            if let Some(last) = rotated.pop_back() {
                rotated.push_front(last);
            }
        }
    }
    rotated.into()
}

/// The dealer's name in table order: the last seat, except heads-up where
/// the first of the two deals.
pub fn dealer_name(players: &[String]) -> Option<&String> {
    if players.len() == 2 {
        players.first()
    } else {
        players.last()
    }
}

/// Builds the view for one replay step, the showdown, or the advance
/// signal. This is the composition the route handlers serve.
pub fn hand_view(hand: &Hand, step: usize) -> Result<ReplayOutcome, ViewError> {
    let len = hand.action_count();
    if step > len {
        return Ok(ReplayOutcome::Advance);
    }
    if step == len {
        return Ok(ReplayOutcome::Showdown(showdown_view(hand)?));
    }
    Ok(ReplayOutcome::Step(step_view(hand, step)?))
}

fn step_view(hand: &Hand, step: usize) -> Result<TableView, ViewError> {
    let current_player = match &hand.history[step] {
        Action::Bet { player, .. } => Some(player.as_str()),
        Action::RoundBoundary => None,
    };
    let dealer = dealer_name(&hand.players).cloned();

    let mut seats = Vec::with_capacity(SEAT_COUNT);
    for name in seat_order(&hand.players) {
        let resolved = replay::last_move(hand, &name, step)?;
        let (move_label, stake) = match resolved {
            LastMove::NoAction => (None, Some(replay::stake_for_player(hand, &name, step)?)),
            LastMove::Fold => (Some("FOLD"), None),
            LastMove::Move { label, .. } => (
                Some(label.label()),
                Some(replay::stake_for_player(hand, &name, step)?),
            ),
        };
        seats.push(SeatView {
            move_label,
            stake,
            cards: hand.pocket_cards(&name)?.into_iter().map(Into::into).collect(),
            badge: (dealer.as_deref() == Some(name.as_str())).then_some(Badge::Dealer),
            current: current_player == Some(name.as_str()),
            name,
        });
    }
    pad_seats(&mut seats);

    Ok(TableView {
        pot: replay::pot(hand, step)?,
        community_cards: community_cards(hand, step)?,
        seats,
    })
}

fn showdown_view(hand: &Hand) -> Result<TableView, ViewError> {
    let mut seats = Vec::with_capacity(SEAT_COUNT);
    for name in seat_order(&hand.players) {
        seats.push(SeatView {
            move_label: None,
            stake: None,
            cards: hand.pocket_cards(&name)?.into_iter().map(Into::into).collect(),
            badge: hand.winners.contains(&name).then_some(Badge::Winner),
            current: false,
            name,
        });
    }
    pad_seats(&mut seats);

    // The board stays at the street of the last real action.
    let community_cards = match hand.action_count() {
        0 => Vec::new(),
        len => community_cards(hand, len - 1)?,
    };

    Ok(TableView {
        pot: hand.pot_share,
        community_cards,
        seats,
    })
}

fn community_cards(hand: &Hand, step: usize) -> Result<Vec<CardView>, ViewError> {
    let round = replay::bet_round(hand, step)?;
    let street = Street::from_round(round).ok_or(ViewError::TooManyRounds(round))?;
    let cards = hand.community_cards()?;
    Ok(cards
        .into_iter()
        .take(street.revealed_cards())
        .map(Into::into)
        .collect())
}

fn pad_seats(seats: &mut Vec<SeatView>) {
    while seats.len() < SEAT_COUNT {
        seats.push(SeatView::empty());
    }
}
