//! # railbird-web: the hand-history spectator server
//!
//! Serves step-by-step replays of completed poker hands over HTTP: a JSON
//! API for the replay views, a "latest games" listing, and the static
//! frontend. The replay computations live in `railbird-replay`; this crate
//! adds the hand archive, the rendering adapter and the warp plumbing.

pub mod archive;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod static_handler;
pub mod view;

pub use archive::{document_id, ArchiveError, HandArchive, JsonlArchive, MemoryArchive};
pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use logging::{init_logging, init_test_logging, LogEntry, TestLogSubscriber};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use static_handler::{StaticError, StaticHandler};
pub use view::{hand_view, seat_order, ReplayOutcome, SeatView, TableView, ViewError};
