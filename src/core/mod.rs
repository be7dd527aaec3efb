//! Core board primitives.
//!
//! Pure geometry and color types with no game rules attached.
//! Everything here is a small copy type; the rules engine in
//! [`crate::game`] is built on top of these.

pub mod color;
pub mod coord;

// Re-export core types
pub use color::Color;
pub use coord::{Coord, Direction, ParseCoordError, Ray, BOARD_SIDE, CELL_COUNT};
