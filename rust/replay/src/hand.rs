use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::Action;
use crate::cards::{parse_cards, Card, CardError};

/// Complete record of one finished poker hand, as stored in the archive.
///
/// The serde layout matches the archive document format: `players` in
/// seating order, `pot_share` holding the final distributed pot, `winners`
/// populated once the hand is complete, `pocketcards` and `communitycards`
/// as compact card labels, and `history` as the ordered action log.
///
/// Hands are immutable once recorded; the replay engine only ever reads
/// them.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    /// Document identifier (`"{tournament}-{table}:{hand:0>10}"`)
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Seated players, in table order
    pub players: Vec<String>,
    /// Final pot paid out at showdown
    pub pot_share: u32,
    /// Names of the winning players
    pub winners: Vec<String>,
    /// Hole cards per player, as card labels
    pub pocketcards: BTreeMap<String, Vec<String>>,
    /// Community cards, as card labels (up to 5)
    pub communitycards: Vec<String>,
    /// The ordered action log
    pub history: Vec<Action>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandError {
    #[error("hand has no players")]
    NoPlayers,
    #[error("empty player name")]
    EmptyPlayerName,
    #[error("action {index} references unknown player {player:?}")]
    UnknownActor { index: usize, player: String },
    #[error("winner {0:?} is not seated in this hand")]
    UnknownWinner(String),
    #[error("pocket cards recorded for unseated player {0:?}")]
    UnseatedPocketCards(String),
    #[error("bad card label: {0}")]
    BadCard(#[from] CardError),
}

impl Hand {
    pub fn action_count(&self) -> usize {
        self.history.len()
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }

    /// Parsed community cards, in board order.
    pub fn community_cards(&self) -> Result<Vec<Card>, CardError> {
        parse_cards(&self.communitycards)
    }

    /// Parsed pocket cards for one player, empty if none were recorded.
    pub fn pocket_cards(&self, name: &str) -> Result<Vec<Card>, CardError> {
        match self.pocketcards.get(name) {
            Some(labels) => parse_cards(labels),
            None => Ok(Vec::new()),
        }
    }

    /// Structural validation applied when a document enters the system.
    ///
    /// The replay computations assume a well-formed log, so malformed
    /// documents are rejected here rather than guessed at later.
    pub fn validate(&self) -> Result<(), HandError> {
        if self.players.is_empty() {
            return Err(HandError::NoPlayers);
        }
        if self.players.iter().any(|p| p.is_empty()) {
            return Err(HandError::EmptyPlayerName);
        }
        for (index, action) in self.history.iter().enumerate() {
            if let Action::Bet { player, .. } = action {
                if player.is_empty() {
                    return Err(HandError::EmptyPlayerName);
                }
                if !self.has_player(player) {
                    return Err(HandError::UnknownActor {
                        index,
                        player: player.clone(),
                    });
                }
            }
        }
        for winner in &self.winners {
            if !self.has_player(winner) {
                return Err(HandError::UnknownWinner(winner.clone()));
            }
        }
        for (player, labels) in &self.pocketcards {
            if !self.has_player(player) {
                return Err(HandError::UnseatedPocketCards(player.clone()));
            }
            parse_cards(labels)?;
        }
        parse_cards(&self.communitycards)?;
        Ok(())
    }
}
