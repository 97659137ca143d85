//! Hand archive: where completed hand documents come from.
//!
//! The archive is injected into the server as a trait object; nothing in
//! the replay path touches a global store handle. Hands are validated once
//! on the way in and are immutable afterwards.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use railbird_replay::hand::{Hand, HandError};
use thiserror::Error;

/// How many of the most recent games the "latest" listing covers.
pub const LATEST_WINDOW: usize = 10;

/// Document id for a hand: `"{tournament}-{table}:{hand:0>10}"`.
///
/// The zero-padded hand number keeps lexicographic id order equal to play
/// order, which `last_games` relies on.
pub fn document_id(tournament: &str, table: u32, hand_no: u64) -> String {
    format!("{}-{}:{:010}", tournament, table, hand_no)
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("unknown tournament: {0:?}")]
    TournamentNotFound(String),
    #[error("hand not found: {0:?}")]
    HandNotFound(String),
    #[error("malformed hand document {id:?}: {detail}")]
    MalformedHand { id: String, detail: String },
    #[error("archive storage poisoned")]
    StoragePoisoned,
    #[error("archive io error: {0}")]
    Io(#[from] std::io::Error),
}

impl crate::errors::IntoErrorResponse for ArchiveError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            ArchiveError::TournamentNotFound(_) | ArchiveError::HandNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ArchiveError::MalformedHand { .. }
            | ArchiveError::StoragePoisoned
            | ArchiveError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ArchiveError::TournamentNotFound(_) => "tournament_not_found",
            ArchiveError::HandNotFound(_) => "hand_not_found",
            ArchiveError::MalformedHand { .. } => "malformed_hand",
            ArchiveError::StoragePoisoned => "archive_storage_error",
            ArchiveError::Io(_) => "archive_io_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        use crate::errors::ErrorSeverity;
        match self {
            ArchiveError::TournamentNotFound(_) | ArchiveError::HandNotFound(_) => {
                ErrorSeverity::Client
            }
            ArchiveError::MalformedHand { .. } | ArchiveError::Io(_) => ErrorSeverity::Server,
            ArchiveError::StoragePoisoned => ErrorSeverity::Critical,
        }
    }
}

/// The action log accessor: read-only lookup of recorded hands.
pub trait HandArchive: Send + Sync {
    /// Hand by tournament, table and hand number.
    fn hand(&self, tournament: &str, table: u32, hand_no: u64) -> Result<Hand, ArchiveError>;

    /// Hand by its document id.
    fn hand_by_id(&self, tournament: &str, id: &str) -> Result<Hand, ArchiveError>;

    /// Ids of the most recent games for a tournament, oldest first,
    /// capped at [`LATEST_WINDOW`].
    fn last_games(&self, tournament: &str) -> Result<Vec<String>, ArchiveError>;
}

/// In-memory archive keyed by tournament. Backs the JSONL loader and the
/// tests.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    tournaments: RwLock<HashMap<String, Vec<Hand>>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a hand document. Hands are kept sorted by id
    /// so that id order equals play order.
    pub fn add_hand(&self, tournament: &str, hand: Hand) -> Result<(), ArchiveError> {
        if hand.id.is_empty() {
            return Err(ArchiveError::MalformedHand {
                id: String::new(),
                detail: "missing document id".to_string(),
            });
        }
        hand.validate().map_err(|err| malformed(&hand.id, err))?;
        let mut tournaments = self
            .tournaments
            .write()
            .map_err(|_| ArchiveError::StoragePoisoned)?;
        let hands = tournaments.entry(tournament.to_string()).or_default();
        hands.push(hand);
        hands.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(())
    }

    pub fn tournament_count(&self) -> Result<usize, ArchiveError> {
        let tournaments = self
            .tournaments
            .read()
            .map_err(|_| ArchiveError::StoragePoisoned)?;
        Ok(tournaments.len())
    }
}

impl HandArchive for MemoryArchive {
    fn hand(&self, tournament: &str, table: u32, hand_no: u64) -> Result<Hand, ArchiveError> {
        self.hand_by_id(tournament, &document_id(tournament, table, hand_no))
    }

    fn hand_by_id(&self, tournament: &str, id: &str) -> Result<Hand, ArchiveError> {
        let tournaments = self
            .tournaments
            .read()
            .map_err(|_| ArchiveError::StoragePoisoned)?;
        let hands = tournaments
            .get(tournament)
            .ok_or_else(|| ArchiveError::TournamentNotFound(tournament.to_string()))?;
        hands
            .iter()
            .find(|h| h.id == id)
            .cloned()
            .ok_or_else(|| ArchiveError::HandNotFound(id.to_string()))
    }

    fn last_games(&self, tournament: &str) -> Result<Vec<String>, ArchiveError> {
        let tournaments = self
            .tournaments
            .read()
            .map_err(|_| ArchiveError::StoragePoisoned)?;
        let hands = tournaments
            .get(tournament)
            .ok_or_else(|| ArchiveError::TournamentNotFound(tournament.to_string()))?;
        let skip = hands.len().saturating_sub(LATEST_WINDOW);
        Ok(hands.iter().skip(skip).map(|h| h.id.clone()).collect())
    }
}

/// Archive loaded from a directory of `{tournament}.jsonl` files, one hand
/// document per line. The whole directory is read and validated at open;
/// the log is immutable afterwards, so there is nothing to re-read.
#[derive(Debug)]
pub struct JsonlArchive {
    inner: MemoryArchive,
}

impl JsonlArchive {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let inner = MemoryArchive::new();
        for entry in std::fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
                continue;
            }
            let Some(tournament) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let contents = std::fs::read_to_string(&path)?;
            for line in contents.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                let hand: Hand = serde_json::from_str(line).map_err(|err| {
                    ArchiveError::MalformedHand {
                        id: format!("{}:?", tournament),
                        detail: err.to_string(),
                    }
                })?;
                inner.add_hand(tournament, hand)?;
            }
        }
        Ok(Self { inner })
    }

    pub fn tournament_count(&self) -> Result<usize, ArchiveError> {
        self.inner.tournament_count()
    }
}

impl HandArchive for JsonlArchive {
    fn hand(&self, tournament: &str, table: u32, hand_no: u64) -> Result<Hand, ArchiveError> {
        self.inner.hand(tournament, table, hand_no)
    }

    fn hand_by_id(&self, tournament: &str, id: &str) -> Result<Hand, ArchiveError> {
        self.inner.hand_by_id(tournament, id)
    }

    fn last_games(&self, tournament: &str) -> Result<Vec<String>, ArchiveError> {
        self.inner.last_games(tournament)
    }
}

fn malformed(id: &str, err: HandError) -> ArchiveError {
    ArchiveError::MalformedHand {
        id: id.to_string(),
        detail: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railbird_replay::action::{Action, Move};

    fn hand_numbered(tournament: &str, hand_no: u64) -> Hand {
        Hand {
            id: document_id(tournament, 0, hand_no),
            players: vec!["alice".to_string(), "bob".to_string()],
            pot_share: 20,
            winners: vec!["alice".to_string()],
            pocketcards: Default::default(),
            communitycards: Vec::new(),
            history: vec![
                Action::bet("alice", Move::Bet, 10),
                Action::bet("bob", Move::Call, 10),
            ],
        }
    }

    #[test]
    fn document_ids_are_zero_padded() {
        assert_eq!(document_id("spiel", 2, 17), "spiel-2:0000000017");
    }

    #[test]
    fn stores_and_finds_hands_by_coordinates() {
        let archive = MemoryArchive::new();
        archive
            .add_hand("spiel", hand_numbered("spiel", 1))
            .expect("add");

        let hand = archive.hand("spiel", 0, 1).expect("lookup");
        assert_eq!(hand.id, "spiel-0:0000000001");

        assert!(matches!(
            archive.hand("spiel", 0, 2),
            Err(ArchiveError::HandNotFound(_))
        ));
        assert!(matches!(
            archive.hand("other", 0, 1),
            Err(ArchiveError::TournamentNotFound(_))
        ));
    }

    #[test]
    fn last_games_returns_newest_window_oldest_first() {
        let archive = MemoryArchive::new();
        for hand_no in 1..=12 {
            archive
                .add_hand("spiel", hand_numbered("spiel", hand_no))
                .expect("add");
        }

        let ids = archive.last_games("spiel").expect("last games");
        assert_eq!(ids.len(), LATEST_WINDOW);
        assert_eq!(ids.first().unwrap(), &document_id("spiel", 0, 3));
        assert_eq!(ids.last().unwrap(), &document_id("spiel", 0, 12));
    }

    #[test]
    fn rejects_invalid_documents_on_add() {
        let archive = MemoryArchive::new();
        let mut hand = hand_numbered("spiel", 1);
        hand.history.push(Action::bet("mallory", Move::Raise, 50));

        assert!(matches!(
            archive.add_hand("spiel", hand),
            Err(ArchiveError::MalformedHand { .. })
        ));
    }

    #[test]
    fn jsonl_archive_loads_a_directory() {
        let dir = std::env::temp_dir().join("railbird_archive_test");
        std::fs::create_dir_all(&dir).expect("mkdir");
        let doc = serde_json::to_string(&hand_numbered("spiel", 1)).expect("serialize");
        std::fs::write(dir.join("spiel.jsonl"), format!("{doc}\n")).expect("write");

        let archive = JsonlArchive::open(&dir).expect("open");
        assert_eq!(archive.tournament_count().expect("count"), 1);
        let hand = archive.hand("spiel", 0, 1).expect("lookup");
        assert_eq!(hand.pot_share, 20);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn jsonl_archive_rejects_garbage_lines() {
        let dir = std::env::temp_dir().join("railbird_archive_garbage_test");
        std::fs::create_dir_all(&dir).expect("mkdir");
        std::fs::write(dir.join("spiel.jsonl"), "not a document\n").expect("write");

        assert!(matches!(
            JsonlArchive::open(&dir),
            Err(ArchiveError::MalformedHand { .. })
        ));

        std::fs::remove_dir_all(&dir).ok();
    }
}
