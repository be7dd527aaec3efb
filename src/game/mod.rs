//! Game Logic Module
//!
//! The rules engine and everything built on it.
//!
//! ## Module Structure
//!
//! - `board`: immutable board snapshots and their transitions
//! - `session`: solitary and shared games, turn ownership, store sync
//! - `refresh`: background polling of a shared game's stored board

pub mod board;
pub mod refresh;
pub mod session;

// Re-export key types
pub use board::{Board, BoardError, Placements, OPENING_PLACEMENTS};
pub use refresh::{RefreshLoop, SessionHandle, REFRESH_INTERVAL};
pub use session::{Game, GameError, GameId, MAX_JOIN_PLACEMENTS};

/// How a failed operation relates to the caller's request.
///
/// The text front end prints a usage hint only for argument failures;
/// state failures stand on their message alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is malformed or names an impossible target.
    InvalidArgument,
    /// The request is well formed but the current state forbids it.
    InvalidState,
}
