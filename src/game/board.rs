//! Board State Machine
//!
//! Immutable board snapshots and the placement/forfeit transitions
//! between them. Every transition allocates a new snapshot; a failed
//! transition leaves the input untouched. Placement maps use BTreeMap,
//! so iteration is always row-major.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::color::Color;
use crate::core::coord::{Coord, Direction, BOARD_SIDE, CELL_COUNT};
use crate::game::ErrorKind;

/// Every occupied cell of a board and the color currently shown on it.
pub type Placements = BTreeMap<Coord, Color>;

/// Discs on a freshly created board.
pub const OPENING_PLACEMENTS: usize = 4;

// =============================================================================
// ERRORS
// =============================================================================

/// Reasons a board transition is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The target cell already holds a disc.
    #[error("Position {0} is not empty")]
    Occupied(Coord),

    /// The target cell closes no run of opposing discs.
    #[error("Position {0} is not playable")]
    NotPlayable(Coord),

    /// The game already ended; finished boards accept no transition.
    #[error("Game is over")]
    GameOver,

    /// A forfeit was requested while a placement exists. Names the first
    /// playable cell in row-major order.
    #[error("Play at least {0}")]
    MovesAvailable(Coord),
}

impl BoardError {
    /// Coarse class of the failure: bad target cell versus a transition
    /// the board no longer permits.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BoardError::Occupied(_) | BoardError::NotPlayable(_) => ErrorKind::InvalidArgument,
            BoardError::GameOver | BoardError::MovesAvailable(_) => ErrorKind::InvalidState,
        }
    }
}

// =============================================================================
// BOARD
// =============================================================================

/// A position plus whose move it is, or how the game ended.
///
/// `Pass` marks a running game where the previous side to move had no
/// placement and forfeited; for legality and transitions it behaves
/// exactly like `Run`. Two consecutive forfeits resolve the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Board {
    /// Game in progress.
    Run {
        /// Occupied cells.
        moves: Placements,
        /// Color to move.
        turn: Color,
    },
    /// Game in progress, reached by a forfeit.
    Pass {
        /// Occupied cells.
        moves: Placements,
        /// Color to move.
        turn: Color,
    },
    /// Finished with a winner.
    Win {
        /// Occupied cells.
        moves: Placements,
        /// The majority color.
        winner: Color,
    },
    /// Finished with both colors even.
    Draw {
        /// Occupied cells.
        moves: Placements,
    },
}

impl Board {
    /// A fresh board: the four center cells occupied, light discs on the
    /// main diagonal, dark on the anti-diagonal, `first` to move.
    pub fn new(first: Color) -> Board {
        let mid = (BOARD_SIDE / 2) as usize;
        let cell = |row: usize, col: usize| Coord::ALL[row * BOARD_SIDE as usize + col];
        let mut moves = Placements::new();
        moves.insert(cell(mid - 1, mid - 1), Color::Light);
        moves.insert(cell(mid - 1, mid), Color::Dark);
        moves.insert(cell(mid, mid - 1), Color::Dark);
        moves.insert(cell(mid, mid), Color::Light);
        Board::Run { moves, turn: first }
    }

    /// Every occupied cell and its color.
    #[inline]
    pub fn moves(&self) -> &Placements {
        match self {
            Board::Run { moves, .. }
            | Board::Pass { moves, .. }
            | Board::Win { moves, .. }
            | Board::Draw { moves } => moves,
        }
    }

    /// The color to move, while the game is running.
    #[inline]
    pub fn turn(&self) -> Option<Color> {
        match self {
            Board::Run { turn, .. } | Board::Pass { turn, .. } => Some(*turn),
            _ => None,
        }
    }

    /// The winning color of a finished game.
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        match self {
            Board::Win { winner, .. } => Some(*winner),
            _ => None,
        }
    }

    /// True once the game reached `Win` or `Draw`.
    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self, Board::Win { .. } | Board::Draw { .. })
    }

    /// True while only the opening discs are on the board.
    #[inline]
    pub fn is_opening(&self) -> bool {
        self.moves().len() == OPENING_PLACEMENTS
    }

    /// True when the side to move has no legal placement.
    /// Finished boards trivially qualify.
    pub fn must_pass(&self) -> bool {
        self.playable_cells().is_empty()
    }

    /// Number of discs currently showing `color`.
    pub fn count(&self, color: Color) -> usize {
        self.moves().values().filter(|&&c| c == color).count()
    }

    /// Change-detection comparison: same variant and same placement
    /// count only. Boards differing cell by cell can still be weakly
    /// equal; refresh relies on exactly that. Use `==` for structural
    /// equality.
    pub fn weak_eq(&self, other: &Board) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.moves().len() == other.moves().len()
    }

    /// True when `pos` is a legal placement for the color to move.
    ///
    /// Occupied cells are never playable. A vacant cell is playable when
    /// in at least one direction an unbroken run of opposing discs starts
    /// next to `pos` and a disc of the mover closes it off.
    pub fn is_playable(&self, pos: Coord) -> bool {
        let (moves, turn) = match self {
            Board::Run { moves, turn } | Board::Pass { moves, turn } => (moves, *turn),
            _ => return false,
        };
        if moves.contains_key(&pos) {
            return false;
        }
        // Cheap reject: a bracket needs an opposing disc next door.
        let opponent = turn.other();
        if !pos.neighbors().any(|n| moves.get(&n) == Some(&opponent)) {
            return false;
        }
        Direction::ALL
            .iter()
            .any(|&dir| bracket_end(moves, turn, pos, dir).is_some())
    }

    /// Every legal placement for the color to move, row-major.
    /// Empty on finished boards.
    pub fn playable_cells(&self) -> Vec<Coord> {
        Coord::ALL
            .iter()
            .copied()
            .filter(|&pos| self.is_playable(pos))
            .collect()
    }

    /// The placement map after the mover takes `pos`: every bracketed
    /// opposing disc recolored to the mover, plus `pos` itself.
    ///
    /// Vacant cells stay vacant; the map only ever gains `pos`. Finished
    /// boards return their map unchanged.
    pub fn placements_after(&self, pos: Coord) -> Placements {
        let (moves, turn) = match self {
            Board::Run { moves, turn } | Board::Pass { moves, turn } => (moves, *turn),
            _ => return self.moves().clone(),
        };
        let mut next = moves.clone();
        for dir in Direction::ALL {
            if let Some(end) = bracket_end(moves, turn, pos, dir) {
                for cell in pos.ray(dir) {
                    if cell == end {
                        break;
                    }
                    next.insert(cell, turn);
                }
            }
        }
        next.insert(pos, turn);
        next
    }

    /// Place a disc for the color to move.
    ///
    /// Fails with [`BoardError::GameOver`] on finished boards, with
    /// [`BoardError::Occupied`] or [`BoardError::NotPlayable`] on bad
    /// targets. On success the new map is classified: a full board with
    /// unequal counts is a `Win` for the majority color, a full board
    /// with equal counts a `Draw`, anything else keeps running with the
    /// turn flipped.
    pub fn play(&self, pos: Coord) -> Result<Board, BoardError> {
        let turn = match self.turn() {
            Some(turn) => turn,
            None => return Err(BoardError::GameOver),
        };
        if self.moves().contains_key(&pos) {
            return Err(BoardError::Occupied(pos));
        }
        if !self.is_playable(pos) {
            return Err(BoardError::NotPlayable(pos));
        }
        Ok(classify(self.placements_after(pos), turn))
    }

    /// Forfeit the turn. Only legal when no placement exists.
    ///
    /// A first forfeit keeps the game running with the turn flipped. A
    /// second consecutive forfeit resolves it: strictly more discs wins,
    /// an opponent with no discs at all loses outright, equal counts
    /// draw.
    pub fn pass(&self) -> Result<Board, BoardError> {
        let turn = match self.turn() {
            Some(turn) => turn,
            None => return Err(BoardError::GameOver),
        };
        if let Some(&first) = self.playable_cells().first() {
            return Err(BoardError::MovesAvailable(first));
        }
        Ok(match self {
            Board::Pass { moves, .. } => resolve_stalemate(moves.clone(), turn),
            _ => Board::Pass {
                moves: self.moves().clone(),
                turn: turn.other(),
            },
        })
    }
}

/// The mover's disc closing the run of opposing discs from `pos` in
/// `dir`, when that run is non-empty.
fn bracket_end(moves: &Placements, turn: Color, pos: Coord, dir: Direction) -> Option<Coord> {
    let mut run = 0usize;
    for cell in pos.ray(dir) {
        match moves.get(&cell) {
            Some(&color) if color != turn => run += 1,
            Some(_) if run > 0 => return Some(cell),
            _ => return None,
        }
    }
    None
}

/// Successor state for a completed placement map.
fn classify(moves: Placements, turn: Color) -> Board {
    if moves.len() == CELL_COUNT {
        let dark = moves.values().filter(|&&c| c == Color::Dark).count();
        let light = CELL_COUNT - dark;
        if dark == light {
            Board::Draw { moves }
        } else {
            let winner = if dark > light { Color::Dark } else { Color::Light };
            Board::Win { moves, winner }
        }
    } else {
        Board::Run {
            moves,
            turn: turn.other(),
        }
    }
}

/// Outcome when neither side can place a disc. `turn` is the second
/// forfeiter.
fn resolve_stalemate(moves: Placements, turn: Color) -> Board {
    let own = moves.values().filter(|&&c| c == turn).count();
    let other = moves.len() - own;
    if own > other || other == 0 {
        Board::Win { moves, winner: turn }
    } else if own < other || own == 0 {
        Board::Win {
            moves,
            winner: turn.other(),
        }
    } else {
        Board::Draw { moves }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(row: u8, col: u8) -> Coord {
        Coord::new(row, col).unwrap()
    }

    #[test]
    fn test_opening_board() {
        let board = Board::new(Color::Dark);
        assert_eq!(board.moves().len(), 4);
        assert!(board.is_opening());
        assert!(!board.is_over());
        assert_eq!(board.turn(), Some(Color::Dark));
        assert_eq!(board.count(Color::Dark), 2);
        assert_eq!(board.count(Color::Light), 2);
        assert_eq!(board.moves().get(&at(3, 3)), Some(&Color::Light));
        assert_eq!(board.moves().get(&at(3, 4)), Some(&Color::Dark));
        assert_eq!(board.moves().get(&at(4, 3)), Some(&Color::Dark));
        assert_eq!(board.moves().get(&at(4, 4)), Some(&Color::Light));
    }

    #[test]
    fn test_opening_legal_targets() {
        let board = Board::new(Color::Dark);
        let targets = board.playable_cells();
        assert_eq!(targets, vec![at(2, 3), at(3, 2), at(4, 5), at(5, 4)]);

        let board = Board::new(Color::Light);
        let targets = board.playable_cells();
        assert_eq!(targets, vec![at(2, 4), at(3, 5), at(4, 2), at(5, 3)]);
    }

    #[test]
    fn test_play_flips_bracketed_run() {
        let board = Board::new(Color::Dark);
        let next = board.play(at(2, 3)).unwrap();
        assert_eq!(next.turn(), Some(Color::Light));
        assert_eq!(next.moves().len(), 5);
        assert_eq!(next.count(Color::Dark), 4);
        assert_eq!(next.count(Color::Light), 1);
        assert_eq!(next.moves().get(&at(3, 3)), Some(&Color::Dark));
        // the input snapshot is untouched
        assert_eq!(board.moves().len(), 4);
        assert_eq!(board.count(Color::Dark), 2);
    }

    #[test]
    fn test_play_rejects_bad_targets() {
        let board = Board::new(Color::Dark);
        assert_eq!(board.play(at(3, 3)), Err(BoardError::Occupied(at(3, 3))));
        assert_eq!(board.play(at(0, 0)), Err(BoardError::NotPlayable(at(0, 0))));
        // a vacant cell next to an opposing disc still needs the bracket
        assert_eq!(board.play(at(2, 2)), Err(BoardError::NotPlayable(at(2, 2))));
    }

    #[test]
    fn test_terminal_boards_reject_transitions() {
        let board = Board::Win {
            moves: Placements::new(),
            winner: Color::Dark,
        };
        assert_eq!(board.play(at(0, 0)), Err(BoardError::GameOver));
        assert_eq!(board.pass(), Err(BoardError::GameOver));
        assert!(!board.is_playable(at(0, 0)));
        assert!(board.playable_cells().is_empty());

        let board = Board::Draw {
            moves: Placements::new(),
        };
        assert_eq!(board.play(at(0, 0)), Err(BoardError::GameOver));
        assert_eq!(board.pass(), Err(BoardError::GameOver));
    }

    #[test]
    fn test_pass_rejected_while_moves_remain() {
        let board = Board::new(Color::Dark);
        assert_eq!(board.pass(), Err(BoardError::MovesAvailable(at(2, 3))));
        assert!(!board.must_pass());
    }

    #[test]
    fn test_forfeit_then_resolution() {
        // Only dark discs on the board: neither side can bracket anything.
        let mut moves = Placements::new();
        moves.insert(at(0, 0), Color::Dark);
        moves.insert(at(0, 1), Color::Dark);
        let board = Board::Run {
            moves,
            turn: Color::Light,
        };
        assert!(board.must_pass());

        let passed = board.pass().unwrap();
        assert!(matches!(passed, Board::Pass { .. }));
        assert_eq!(passed.turn(), Some(Color::Dark));
        assert_eq!(passed.moves(), board.moves());

        let resolved = passed.pass().unwrap();
        assert_eq!(resolved.winner(), Some(Color::Dark));
    }

    #[test]
    fn test_playable_iff_play_succeeds() {
        let boards = [
            Board::new(Color::Dark),
            Board::new(Color::Light),
            Board::new(Color::Dark).play(at(2, 3)).unwrap(),
        ];
        for board in boards {
            for pos in Coord::ALL {
                assert_eq!(
                    board.is_playable(pos),
                    board.play(pos).is_ok(),
                    "legality and play disagree at {pos}"
                );
            }
        }
    }

    #[test]
    fn test_double_forfeit_majority_wins() {
        // both sides still hold discs; the count decides
        let mut moves = Placements::new();
        moves.insert(at(0, 0), Color::Dark);
        moves.insert(at(0, 2), Color::Dark);
        moves.insert(at(0, 4), Color::Dark);
        moves.insert(at(0, 6), Color::Light);
        let board = Board::Pass {
            moves: moves.clone(),
            turn: Color::Dark,
        };
        assert_eq!(board.pass().unwrap().winner(), Some(Color::Dark));

        // same position but light forfeits second; dark still wins
        let board = Board::Pass {
            moves,
            turn: Color::Light,
        };
        assert_eq!(board.pass().unwrap().winner(), Some(Color::Dark));
    }

    #[test]
    fn test_double_forfeit_loser_has_no_discs() {
        let mut moves = Placements::new();
        moves.insert(at(0, 0), Color::Light);
        moves.insert(at(0, 1), Color::Light);
        let board = Board::Pass {
            moves,
            turn: Color::Dark,
        };
        // dark forfeits with zero discs of its own
        assert_eq!(board.pass().unwrap().winner(), Some(Color::Light));
    }

    #[test]
    fn test_double_forfeit_even_counts_draw() {
        let mut moves = Placements::new();
        moves.insert(at(0, 0), Color::Dark);
        moves.insert(at(0, 7), Color::Light);
        let board = Board::Pass {
            moves,
            turn: Color::Dark,
        };
        assert!(matches!(board.pass().unwrap(), Board::Draw { .. }));
    }

    #[test]
    fn test_play_on_passed_board_resumes_running() {
        let mut moves = Placements::new();
        moves.insert(at(0, 1), Color::Light);
        moves.insert(at(0, 2), Color::Dark);
        let board = Board::Pass {
            moves,
            turn: Color::Dark,
        };
        let next = board.play(at(0, 0)).unwrap();
        assert!(matches!(next, Board::Run { .. }));
        assert_eq!(next.turn(), Some(Color::Light));
        assert_eq!(next.count(Color::Dark), 3);
    }

    /// 63 occupied cells with a single bracket left for dark at H8.
    fn one_cell_left(extra_dark: usize) -> Board {
        let mut moves = Placements::new();
        for cell in Coord::ALL.iter().copied() {
            if cell != at(7, 7) {
                moves.insert(cell, Color::Light);
            }
        }
        // block the north and northwest rays, leave the west bracket
        moves.insert(at(6, 6), Color::Dark);
        moves.insert(at(6, 7), Color::Dark);
        moves.insert(at(7, 5), Color::Dark);
        for cell in Coord::ALL.iter().copied().take(extra_dark) {
            moves.insert(cell, Color::Dark);
        }
        Board::Run {
            moves,
            turn: Color::Dark,
        }
    }

    #[test]
    fn test_full_board_classifies_win() {
        // 27 dark before the play, 29 after placing and flipping one
        let board = one_cell_left(24);
        let done = board.play(at(7, 7)).unwrap();
        assert_eq!(done.moves().len(), CELL_COUNT);
        assert_eq!(done.winner(), Some(Color::Light));

        // lopsided the other way
        let board = one_cell_left(40);
        let done = board.play(at(7, 7)).unwrap();
        assert_eq!(done.winner(), Some(Color::Dark));
    }

    #[test]
    fn test_full_board_classifies_draw() {
        // 3 + 27 dark before the play; placing and flipping one makes 32/32
        let board = one_cell_left(27);
        assert_eq!(board.count(Color::Dark), 30);
        let done = board.play(at(7, 7)).unwrap();
        assert_eq!(done.moves().len(), CELL_COUNT);
        assert_eq!(done.count(Color::Dark), 32);
        assert!(matches!(done, Board::Draw { .. }));
    }

    #[test]
    fn test_weak_equality_ignores_content() {
        let a = Board::new(Color::Dark);
        let b = Board::new(Color::Light);
        assert!(a.weak_eq(&b), "same variant and size are weakly equal");
        assert_ne!(a, b, "structural equality still differs");

        let played = a.play(at(2, 3)).unwrap();
        assert!(!a.weak_eq(&played), "placement count changed");

        let passed = Board::Pass {
            moves: a.moves().clone(),
            turn: Color::Dark,
        };
        assert!(!a.weak_eq(&passed), "variants differ");
    }

    #[test]
    fn test_flip_map_is_consistent_with_legality() {
        let board = Board::new(Color::Dark);
        for pos in Coord::ALL {
            if !board.is_playable(pos) {
                continue;
            }
            let next = board.placements_after(pos);
            assert_eq!(next.len(), board.moves().len() + 1, "only {pos} is added");
            let flipped = board
                .moves()
                .iter()
                .filter(|(cell, color)| next.get(cell) != Some(color))
                .count();
            assert!(flipped > 0, "a legal move at {pos} must flip something");
            for cell in next.keys() {
                assert!(
                    *cell == pos || board.moves().contains_key(cell),
                    "vacant cells stay vacant"
                );
            }
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let board = Board::new(Color::Dark).play(at(2, 3)).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board, back);
    }

    proptest! {
        /// Random playouts only ever add discs, flip the rest, and walk
        /// monotonically toward a terminal state.
        #[test]
        fn playout_invariants(choices in proptest::collection::vec(0usize..64, 0..70)) {
            let mut board = Board::new(Color::Dark);
            for choice in choices {
                if board.is_over() {
                    prop_assert!(board.play(at(0, 0)).is_err());
                    prop_assert!(board.pass().is_err());
                    break;
                }
                let targets = board.playable_cells();
                let before = board.moves().len();
                if targets.is_empty() {
                    prop_assert!(board.must_pass());
                    board = board.pass().unwrap();
                    prop_assert_eq!(board.moves().len(), before);
                } else {
                    let pos = targets[choice % targets.len()];
                    board = board.play(pos).unwrap();
                    prop_assert_eq!(board.moves().len(), before + 1);
                }
                prop_assert!(board.moves().len() <= CELL_COUNT);
            }
        }
    }
}
