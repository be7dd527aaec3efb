//! Game Sessions
//!
//! One participant's view of a game: a solitary game played locally, or
//! a shared game published through a board store. Sessions are immutable
//! values like boards; every operation returns a replacement session and
//! a failed operation leaves the old one intact.
//!
//! Shared games enforce turn ownership here. The board machine knows
//! nothing about participants; the store knows nothing about turns.

use tracing::{debug, info};

use crate::core::color::Color;
use crate::core::coord::Coord;
use crate::game::board::{Board, BoardError, OPENING_PLACEMENTS};
use crate::game::ErrorKind;
use crate::storage::{BoardStore, StorageError};

/// Identifier of a shared game, chosen by the creating participant.
pub type GameId = String;

/// Most discs a board may hold while the game stays open to join.
pub const MAX_JOIN_PLACEMENTS: usize = OPENING_PLACEMENTS + 1;

// =============================================================================
// ERRORS
// =============================================================================

/// Reasons a session operation is refused.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The board machine refused the transition.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// The store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A move or forfeit was attempted out of turn.
    #[error("Is not your turn")]
    NotYourTurn,

    /// No board is stored under the requested id.
    #[error("Game {0:?} not found")]
    NotFound(GameId),

    /// A strict refresh found the stored board unchanged.
    #[error("No changes")]
    Unchanged,

    /// The join window has closed or the game ended.
    #[error("Game {0:?} is not available")]
    NotJoinable(GameId),

    /// Refresh asked of a game that is not shared.
    #[error("Refresh does not apply to this game")]
    NotShared,
}

impl GameError {
    /// Coarse class of the failure, delegating to the wrapped layer
    /// where one exists. Everything session-specific is a state error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::Board(err) => err.kind(),
            GameError::Storage(err) => err.kind(),
            _ => ErrorKind::InvalidState,
        }
    }
}

// =============================================================================
// GAME
// =============================================================================

/// One participant's view of a game in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Game {
    /// Local game; both colors are played from this session.
    Solitaire {
        /// Current board.
        board: Board,
        /// Whether legal targets are highlighted.
        show_targets: bool,
    },
    /// Game published through a store, one color owned by this session.
    Shared {
        /// Local copy of the shared board.
        board: Board,
        /// The color this session plays. Fixed at create or join time.
        player: Color,
        /// Store key of the game.
        id: GameId,
        /// Whether legal targets are highlighted.
        show_targets: bool,
    },
}

impl Game {
    /// Local game with `first` to move. Never touches a store.
    pub fn solitaire(first: Color) -> Game {
        Game::Solitaire {
            board: Board::new(first),
            show_targets: false,
        }
    }

    /// Create a shared game: a fresh board with `first` to move, stored
    /// under `id`. The creator plays `first`.
    pub async fn create_shared(
        id: impl Into<GameId>,
        first: Color,
        store: &dyn BoardStore,
    ) -> Result<Game, GameError> {
        let id = id.into();
        let board = Board::new(first);
        store.create(&id, &board).await?;
        info!(game = %id, player = %first, "created shared game");
        Ok(Game::Shared {
            board,
            player: first,
            id,
            show_targets: false,
        })
    }

    /// Join a shared game under the stored board.
    ///
    /// Joining is confined to the opening plies: the board must still be
    /// running with at most [`MAX_JOIN_PLACEMENTS`] discs. Past the
    /// opening four the joiner takes the color to move, on an untouched
    /// board the opposite color.
    pub async fn join(id: impl Into<GameId>, store: &dyn BoardStore) -> Result<Game, GameError> {
        let id = id.into();
        let board = store
            .read(&id)
            .await?
            .ok_or_else(|| GameError::NotFound(id.clone()))?;
        let turn = match board.turn() {
            Some(turn) if board.moves().len() <= MAX_JOIN_PLACEMENTS => turn,
            _ => return Err(GameError::NotJoinable(id)),
        };
        let player = if board.moves().len() > OPENING_PLACEMENTS {
            turn
        } else {
            turn.other()
        };
        info!(game = %id, player = %player, "joined shared game");
        Ok(Game::Shared {
            board,
            player,
            id,
            show_targets: false,
        })
    }

    /// Place a disc at `pos` and, for shared games, publish the result.
    pub async fn play(&self, pos: Coord, store: &dyn BoardStore) -> Result<Game, GameError> {
        match self {
            Game::Solitaire { board, show_targets } => Ok(Game::Solitaire {
                board: board.play(pos)?,
                show_targets: *show_targets,
            }),
            Game::Shared {
                board,
                player,
                id,
                show_targets,
            } => {
                Self::ensure_own_turn(board, *player)?;
                let board = board.play(pos)?;
                store.update(id, &board).await?;
                debug!(game = %id, pos = %pos, "published move");
                Ok(Game::Shared {
                    board,
                    player: *player,
                    id: id.clone(),
                    show_targets: *show_targets,
                })
            }
        }
    }

    /// Forfeit the turn and, for shared games, publish the result.
    pub async fn pass(&self, store: &dyn BoardStore) -> Result<Game, GameError> {
        match self {
            Game::Solitaire { board, show_targets } => Ok(Game::Solitaire {
                board: board.pass()?,
                show_targets: *show_targets,
            }),
            Game::Shared {
                board,
                player,
                id,
                show_targets,
            } => {
                Self::ensure_own_turn(board, *player)?;
                let board = board.pass()?;
                store.update(id, &board).await?;
                debug!(game = %id, "published forfeit");
                Ok(Game::Shared {
                    board,
                    player: *player,
                    id: id.clone(),
                    show_targets: *show_targets,
                })
            }
        }
    }

    /// Set the target-highlight flag.
    ///
    /// On a running shared game only the side to move may change it, and
    /// the board is written back unchanged. Finished games let either
    /// side set the flag.
    pub async fn set_targets(&self, flag: bool, store: &dyn BoardStore) -> Result<Game, GameError> {
        match self {
            Game::Solitaire { board, .. } => Ok(Game::Solitaire {
                board: board.clone(),
                show_targets: flag,
            }),
            Game::Shared {
                board, player, id, ..
            } => {
                Self::ensure_own_turn(board, *player)?;
                store.update(id, board).await?;
                Ok(Game::Shared {
                    board: board.clone(),
                    player: *player,
                    id: id.clone(),
                    show_targets: flag,
                })
            }
        }
    }

    /// Adopt the stored board when it changed.
    ///
    /// Change detection uses the board's weak equality: the fetched
    /// board replaces the local one only when variant or placement count
    /// differ. `strict` turns "nothing changed" into an error, which is
    /// what the interactive REFRESH wants; the poll loop refreshes
    /// quietly.
    pub async fn refresh(&self, store: &dyn BoardStore, strict: bool) -> Result<Game, GameError> {
        let (board, player, id, show_targets) = match self {
            Game::Solitaire { .. } => return Err(GameError::NotShared),
            Game::Shared {
                board,
                player,
                id,
                show_targets,
            } => (board, *player, id, *show_targets),
        };
        let fetched = store
            .read(id)
            .await?
            .ok_or_else(|| GameError::NotFound(id.clone()))?;
        if fetched.weak_eq(board) {
            if strict {
                return Err(GameError::Unchanged);
            }
            return Ok(self.clone());
        }
        debug!(game = %id, "adopted stored board");
        Ok(Game::Shared {
            board: fetched,
            player,
            id: id.clone(),
            show_targets,
        })
    }

    /// Current board.
    #[inline]
    pub fn board(&self) -> &Board {
        match self {
            Game::Solitaire { board, .. } | Game::Shared { board, .. } => board,
        }
    }

    /// Target-highlight flag.
    #[inline]
    pub fn show_targets(&self) -> bool {
        match self {
            Game::Solitaire { show_targets, .. } | Game::Shared { show_targets, .. } => {
                *show_targets
            }
        }
    }

    /// Store key of a shared game.
    #[inline]
    pub fn id(&self) -> Option<&str> {
        match self {
            Game::Shared { id, .. } => Some(id),
            _ => None,
        }
    }

    /// The color owned by this session in a shared game.
    #[inline]
    pub fn player(&self) -> Option<Color> {
        match self {
            Game::Shared { player, .. } => Some(*player),
            _ => None,
        }
    }

    /// True for store-backed games.
    #[inline]
    pub fn is_shared(&self) -> bool {
        matches!(self, Game::Shared { .. })
    }

    /// True when the session owner may act right now. Solitary games
    /// own every running turn; shared games only their color's.
    pub fn is_my_turn(&self) -> bool {
        match self {
            Game::Solitaire { board, .. } => board.turn().is_some(),
            Game::Shared { board, player, .. } => board.turn() == Some(*player),
        }
    }

    /// True when target highlights should render for this session's
    /// viewer: the flag is on and, in a shared game, it is their move.
    pub fn targets_visible(&self) -> bool {
        match self {
            Game::Solitaire { show_targets, .. } => *show_targets,
            Game::Shared { show_targets, .. } => *show_targets && self.is_my_turn(),
        }
    }

    /// Turn ownership guard for shared games. Boards without a turn are
    /// left to the board machine, which reports the game as over.
    fn ensure_own_turn(board: &Board, player: Color) -> Result<(), GameError> {
        match board.turn() {
            Some(turn) if turn != player => Err(GameError::NotYourTurn),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
