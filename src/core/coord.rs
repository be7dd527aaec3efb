//! Board Geometry
//!
//! Cells and directional walks on the 8x8 board.
//! Rows and columns are zero-based internally; the text notation is
//! column letter plus 1-based row digit ("D3" is column 3, row 2).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Cells per board edge.
pub const BOARD_SIDE: u8 = 8;

/// Total cells on the board.
pub const CELL_COUNT: usize = (BOARD_SIDE as usize) * (BOARD_SIDE as usize);

/// A cell of the board. Both components are always below [`BOARD_SIDE`].
///
/// Ordering is row-major (row first, then column), so ordered
/// collections keyed by `Coord` iterate the board top-to-bottom,
/// left-to-right.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// Every cell of the board in row-major order.
    pub const ALL: [Coord; CELL_COUNT] = {
        let mut cells = [Coord { row: 0, col: 0 }; CELL_COUNT];
        let mut index = 0;
        while index < CELL_COUNT {
            cells[index] = Coord {
                row: (index / BOARD_SIDE as usize) as u8,
                col: (index % BOARD_SIDE as usize) as u8,
            };
            index += 1;
        }
        cells
    };

    /// Create a cell, or `None` if either component is off the board.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIDE && col < BOARD_SIDE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Zero-based row, counted from the top edge.
    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Zero-based column, counted from the left edge.
    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// The adjacent cell in `dir`, or `None` when the step leaves the board.
    #[inline]
    pub fn step(self, dir: Direction) -> Option<Self> {
        let (dr, dc) = dir.offset();
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..BOARD_SIDE as i8).contains(&row) && (0..BOARD_SIDE as i8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Walk from this cell in `dir` until the board edge.
    ///
    /// The walk starts one step away and never yields this cell itself.
    /// Each call produces a fresh walk.
    #[inline]
    pub fn ray(self, dir: Direction) -> Ray {
        Ray {
            next: self.step(dir),
            dir,
        }
    }

    /// All in-bounds neighbors of this cell.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        Direction::ALL.into_iter().filter_map(move |dir| self.step(dir))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.col) as char, self.row + 1)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({})", self)
    }
}

/// Error for cell notation that does not name a board cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid cell notation {0:?}")]
pub struct ParseCoordError(pub String);

impl FromStr for Coord {
    type Err = ParseCoordError;

    /// Parse column-letter row-digit notation, case insensitive ("D3", "d3").
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let bad = || ParseCoordError(text.to_string());
        let mut chars = text.chars();
        let letter = chars.next().ok_or_else(bad)?;
        let digit = chars.next().ok_or_else(bad)?;
        if chars.next().is_some() {
            return Err(bad());
        }
        let col = match letter.to_ascii_uppercase() {
            c @ 'A'..='Z' => c as u8 - b'A',
            _ => return Err(bad()),
        };
        let row = match digit {
            d @ '1'..='9' => d as u8 - b'1',
            _ => return Err(bad()),
        };
        Coord::new(row, col).ok_or_else(bad)
    }
}

// Cells key the persisted placement map, so they serialize as their
// notation string rather than as a struct.
impl Serialize for Coord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// One of the eight compass directions between adjacent cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    /// Toward row 0.
    North,
    /// Toward row 0, away from column 0.
    NorthEast,
    /// Away from column 0.
    East,
    /// Away from row 0 and column 0.
    SouthEast,
    /// Away from row 0.
    South,
    /// Away from row 0, toward column 0.
    SouthWest,
    /// Toward column 0.
    West,
    /// Toward row 0 and column 0.
    NorthWest,
}

impl Direction {
    /// All eight directions.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// The (row, column) delta of one step in this direction.
    #[inline]
    pub const fn offset(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }
}

/// Iterator over the cells from an origin toward the board edge.
/// Produced by [`Coord::ray`]; does not include the origin.
#[derive(Clone, Debug)]
pub struct Ray {
    next: Option<Coord>,
    dir: Direction,
}

impl Iterator for Ray {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        let current = self.next?;
        self.next = current.step(self.dir);
        Some(current)
    }
}

// =============================================================================
// TESTS
// =============================================================================
