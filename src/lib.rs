//! # Reversi
//!
//! Two-player disc-flipping game with shared games persisted through a
//! pluggable store, playable from a line-oriented front end.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         REVERSI                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Board geometry primitives                 │
//! │  ├── coord.rs    - Cells, directions, rays, "D3" notation    │
//! │  └── color.rs    - The two disc colors                       │
//! │                                                              │
//! │  game/           - Game logic (pure values)                  │
//! │  ├── board.rs    - Board state machine and move legality     │
//! │  ├── session.rs  - Local and shared game sessions            │
//! │  └── refresh.rs  - Background polling of shared games        │
//! │                                                              │
//! │  storage/        - Persistence (async)                       │
//! │  ├── memory.rs   - In-process store for tests                │
//! │  └── file.rs     - One JSON document per game on disk        │
//! │                                                              │
//! │  ui/             - Text front end                            │
//! │  ├── command.rs  - Command grammar and controller            │
//! │  └── output.rs   - Plain-text board rendering                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Value Semantics
//!
//! The `core/` and `game/` modules are **pure values**:
//! - Every operation returns a new board or session, never mutates
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No I/O below the session layer
//!
//! Shared games synchronize through the store alone: two front ends
//! pointed at the same store id see the same game, each polling for
//! the other's moves.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use crate::core::color::Color;
pub use crate::core::coord::{Coord, Direction, ParseCoordError, BOARD_SIDE, CELL_COUNT};
pub use crate::game::board::{Board, BoardError, Placements, OPENING_PLACEMENTS};
pub use crate::game::refresh::{RefreshLoop, SessionHandle, REFRESH_INTERVAL};
pub use crate::game::session::{Game, GameError, GameId, MAX_JOIN_PLACEMENTS};
pub use crate::game::ErrorKind;
pub use crate::storage::{BoardStore, FileStore, MemoryStore, StorageError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
