//! Board Rendering
//!
//! Plain text rendering for the command line:
//!
//! ```text
//!    A B C D E F G H
//! 1  . . . . . . . .
//! 2  . . . . . . . .
//! 3  . . . . . . . .
//! 4  . . . @ # . . .
//! 5  . . . # @ . . .
//! 6  . . . . . . . .
//! 7  . . . . . . . .
//! 8  . . . . . . . .
//! # = 2 | @ = 2
//! turn: DARK
//! ```
//!
//! Legal targets print as `*`, but only for the viewer whose move it
//! is; a shared game never leaks the opponent's options.

use std::fmt::Write;

use crate::core::color::Color;
use crate::core::coord::{Coord, BOARD_SIDE};
use crate::game::board::Board;
use crate::game::session::Game;

/// Marker for a vacant cell.
const VACANT: char = '.';

/// Marker for a legal placement while highlighting is on.
const TARGET: char = '*';

/// Render a session the way the command line shows it after a command.
///
/// Shared games open with a line naming the viewer's color and the
/// game id.
pub fn render_session(game: &Game) -> String {
    let mut out = String::new();
    if let Game::Shared { player, id, .. } = game {
        let _ = writeln!(out, "You are player {} in game {}", player.token(), id);
    }
    out.push_str(&render_board(game.board(), game.targets_visible()));
    out
}

/// Render a board grid plus its score and status lines.
pub fn render_board(board: &Board, show_targets: bool) -> String {
    let targets = if show_targets {
        board.playable_cells()
    } else {
        Vec::new()
    };

    let mut out = String::new();
    out.push_str("  ");
    for col in 0..BOARD_SIDE {
        let _ = write!(out, " {}", (b'A' + col) as char);
    }
    out.push('\n');

    for cell in Coord::ALL {
        if cell.col() == 0 {
            let _ = write!(out, "{} ", cell.row() + 1);
        }
        let mark = match board.moves().get(&cell) {
            Some(color) => color.token(),
            None if targets.contains(&cell) => TARGET,
            None => VACANT,
        };
        let _ = write!(out, " {}", mark);
        if cell.col() == BOARD_SIDE - 1 {
            out.push('\n');
        }
    }

    let _ = writeln!(
        out,
        "# = {} | @ = {}",
        board.count(Color::Dark),
        board.count(Color::Light)
    );
    match board {
        Board::Run { turn, .. } | Board::Pass { turn, .. } => {
            let _ = writeln!(out, "turn: {turn}");
        }
        Board::Win { winner, .. } => {
            let _ = writeln!(out, "winner: {winner}");
        }
        Board::Draw { .. } => {
            let _ = writeln!(out, "Draw");
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_board_grid() {
        let board = Board::new(Color::Dark);
        let expected = "   A B C D E F G H
1  . . . . . . . .
2  . . . . . . . .
3  . . . . . . . .
4  . . . @ # . . .
5  . . . # @ . . .
6  . . . . . . . .
7  . . . . . . . .
8  . . . . . . . .
# = 2 | @ = 2
turn: DARK
";
        assert_eq!(render_board(&board, false), expected);
    }

    #[test]
    fn test_targets_marked_for_mover() {
        let board = Board::new(Color::Dark);
        let rendered = render_board(&board, true);
        let expected = "   A B C D E F G H
1  . . . . . . . .
2  . . . . . . . .
3  . . . * . . . .
4  . . * @ # . . .
5  . . . # @ * . .
6  . . . . * . . .
7  . . . . . . . .
8  . . . . . . . .
# = 2 | @ = 2
turn: DARK
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_shared_header_line() {
        let game = Game::Shared {
            board: Board::new(Color::Dark),
            player: Color::Light,
            id: "duel".into(),
            show_targets: false,
        };
        let rendered = render_session(&game);
        assert!(rendered.starts_with("You are player @ in game duel\n"));
    }

    #[test]
    fn test_shared_viewer_sees_no_opponent_targets() {
        // light's flag is on but it is dark's move
        let game = Game::Shared {
            board: Board::new(Color::Dark),
            player: Color::Light,
            id: "duel".into(),
            show_targets: true,
        };
        assert!(!render_session(&game).contains('*'));

        let game = Game::Shared {
            board: Board::new(Color::Dark),
            player: Color::Dark,
            id: "duel".into(),
            show_targets: true,
        };
        assert!(render_session(&game).contains('*'));
    }

    #[test]
    fn test_finished_board_status_lines() {
        let board = Board::new(Color::Dark);
        let won = Board::Win {
            moves: board.moves().clone(),
            winner: Color::Light,
        };
        let rendered = render_board(&won, false);
        assert!(rendered.contains("winner: LIGHT\n"));
        assert!(rendered.contains("   A B C D E F G H"), "final grid stays visible");

        let drawn = Board::Draw {
            moves: board.moves().clone(),
        };
        assert!(render_board(&drawn, false).ends_with("Draw\n"));
    }
}
