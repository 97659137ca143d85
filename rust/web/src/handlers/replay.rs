//! Replay endpoints: one JSON document per replay step, plus the "latest
//! games" listing used by the auto-following view.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use warp::reply::{self, Response};
use warp::Reply;

use crate::archive::HandArchive;
use crate::errors::IntoErrorResponse;
use crate::view::{hand_view, ReplayOutcome, TableView};

/// Body of a replay step response. `next` is the link the frontend follows
/// to advance the cursor; past the end of a hand the payload switches to
/// `advance` and `next` points at the following hand's first step.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayResponse {
    Step { table: TableView, next: String },
    Showdown { table: TableView, next: String },
    Advance { next: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LatestGamesResponse {
    pub games: Vec<String>,
}

/// GET /api/replay/{tournament}/{table}/{hand}/{step}
pub async fn show_step(
    archive: Arc<dyn HandArchive>,
    tournament: String,
    table_no: u32,
    hand_no: u64,
    step: usize,
) -> Response {
    let hand = match archive.hand(&tournament, table_no, hand_no) {
        Ok(hand) => hand,
        Err(err) => return err.into_http_response(),
    };
    debug!(%tournament, table_no, hand_no, step, "replay step requested");

    let response = match hand_view(&hand, step) {
        Ok(ReplayOutcome::Step(table)) => ReplayResponse::Step {
            table,
            next: step_url(&tournament, table_no, hand_no, step + 1),
        },
        Ok(ReplayOutcome::Showdown(table)) => ReplayResponse::Showdown {
            table,
            next: step_url(&tournament, table_no, hand_no, step + 1),
        },
        Ok(ReplayOutcome::Advance) => ReplayResponse::Advance {
            next: step_url(&tournament, table_no, hand_no + 1, 0),
        },
        Err(err) => return err.into_http_response(),
    };
    reply::json(&response).into_response()
}

/// GET /api/latest/{tournament}
pub async fn latest_games(archive: Arc<dyn HandArchive>, tournament: String) -> Response {
    match archive.last_games(&tournament) {
        Ok(games) => reply::json(&LatestGamesResponse { games }).into_response(),
        Err(err) => err.into_http_response(),
    }
}

/// GET /api/latest/{tournament}/{id}/{step}
///
/// Replay by document id. Running off the end advances to the next of the
/// latest games, wrapping back to the oldest when the current hand is the
/// newest (or no longer listed).
pub async fn show_latest_step(
    archive: Arc<dyn HandArchive>,
    tournament: String,
    id: String,
    step: usize,
) -> Response {
    let hand = match archive.hand_by_id(&tournament, &id) {
        Ok(hand) => hand,
        Err(err) => return err.into_http_response(),
    };

    let response = match hand_view(&hand, step) {
        Ok(ReplayOutcome::Step(table)) => ReplayResponse::Step {
            table,
            next: latest_url(&tournament, &id, step + 1),
        },
        Ok(ReplayOutcome::Showdown(table)) => ReplayResponse::Showdown {
            table,
            next: latest_url(&tournament, &id, step + 1),
        },
        Ok(ReplayOutcome::Advance) => {
            let games = match archive.last_games(&tournament) {
                Ok(games) => games,
                Err(err) => return err.into_http_response(),
            };
            match next_latest_id(&games, &id) {
                Some(next_id) => ReplayResponse::Advance {
                    next: latest_url(&tournament, next_id, 0),
                },
                // Only possible if the archive emptied between lookups.
                None => {
                    return crate::archive::ArchiveError::HandNotFound(id).into_http_response()
                }
            }
        }
        Err(err) => return err.into_http_response(),
    };
    reply::json(&response).into_response()
}

fn step_url(tournament: &str, table_no: u32, hand_no: u64, step: usize) -> String {
    format!("/api/replay/{tournament}/{table_no}/{hand_no}/{step}")
}

fn latest_url(tournament: &str, id: &str, step: usize) -> String {
    format!("/api/latest/{tournament}/{id}/{step}")
}

/// The id after `current` in the latest-games window, wrapping to the
/// oldest when `current` is the newest or not listed. `None` only for an
/// empty window.
fn next_latest_id<'a>(games: &'a [String], current: &str) -> Option<&'a String> {
    match games.iter().position(|g| g == current) {
        Some(index) if index + 1 < games.len() => games.get(index + 1),
        _ => games.first(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn next_latest_follows_the_window_in_order() {
        let games = ids(&["a", "b", "c"]);
        assert_eq!(next_latest_id(&games, "a"), Some(&"b".to_string()));
        assert_eq!(next_latest_id(&games, "b"), Some(&"c".to_string()));
    }

    #[test]
    fn next_latest_wraps_from_the_newest() {
        let games = ids(&["a", "b", "c"]);
        assert_eq!(next_latest_id(&games, "c"), Some(&"a".to_string()));
    }

    #[test]
    fn unlisted_id_restarts_at_the_oldest() {
        let games = ids(&["a", "b", "c"]);
        assert_eq!(next_latest_id(&games, "zzz"), Some(&"a".to_string()));
    }

    #[test]
    fn empty_window_has_no_next() {
        assert_eq!(next_latest_id(&[], "a"), None);
    }

    #[test]
    fn step_urls_mirror_the_route_layout() {
        assert_eq!(step_url("spiel", 0, 7, 3), "/api/replay/spiel/0/7/3");
        assert_eq!(
            latest_url("spiel", "spiel-0:0000000007", 0),
            "/api/latest/spiel/spiel-0:0000000007/0"
        );
    }
}
