use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents one of the four suits in a standard 52-card deck.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    /// Clubs suit (♣)
    Clubs,
    /// Diamonds suit (♦)
    Diamonds,
    /// Hearts suit (♥)
    Hearts,
    /// Spades suit (♠)
    Spades,
}

impl Suit {
    /// Maps the single-letter suffix of a card label to its suit.
    pub fn from_label_char(c: char) -> Option<Suit> {
        match c {
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            'h' => Some(Suit::Hearts),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }

    /// Display name, also used as a CSS class by the frontend.
    pub fn name(self) -> &'static str {
        match self {
            Suit::Clubs => "clubs",
            Suit::Diamonds => "diamonds",
            Suit::Hearts => "hearts",
            Suit::Spades => "spades",
        }
    }
}

/// A playing card parsed from a compact label such as `"As"` or `"10h"`:
/// every character but the last is the rank, the last is the suit.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub rank: String,
    pub suit: Suit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("card label too short: {0:?}")]
    TooShort(String),
    #[error("unknown suit in card label: {0:?}")]
    UnknownSuit(String),
}

impl Card {
    pub fn parse(label: &str) -> Result<Card, CardError> {
        let mut chars = label.chars();
        let suit_char = chars
            .next_back()
            .ok_or_else(|| CardError::TooShort(label.to_string()))?;
        let rank = chars.as_str();
        if rank.is_empty() {
            return Err(CardError::TooShort(label.to_string()));
        }
        let suit = Suit::from_label_char(suit_char)
            .ok_or_else(|| CardError::UnknownSuit(label.to_string()))?;
        Ok(Card {
            rank: rank.to_string(),
            suit,
        })
    }
}

/// Parses an ordered sequence of card labels, failing on the first bad one.
pub fn parse_cards(labels: &[String]) -> Result<Vec<Card>, CardError> {
    labels.iter().map(|label| Card::parse(label)).collect()
}
