pub mod health;
pub mod replay;

pub use health::health;
pub use replay::{latest_games, show_latest_step, show_step, LatestGamesResponse, ReplayResponse};
