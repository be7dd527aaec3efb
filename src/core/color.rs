//! Disc Colors
//!
//! The two sides of the game. A color is both the face of a disc on the
//! board and the identity of the participant who plays it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two disc colors.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Dark discs, shown as `#`.
    Dark,
    /// Light discs, shown as `@`.
    Light,
}

impl Color {
    /// The opposing color. Self-inverse.
    #[inline]
    pub const fn other(self) -> Color {
        match self {
            Color::Dark => Color::Light,
            Color::Light => Color::Dark,
        }
    }

    /// The character this color prints as on the text surface.
    #[inline]
    pub const fn token(self) -> char {
        match self {
            Color::Dark => '#',
            Color::Light => '@',
        }
    }

    /// Parse a surface token back into a color.
    #[inline]
    pub const fn from_token(token: char) -> Option<Color> {
        match token {
            '#' => Some(Color::Dark),
            '@' => Some(Color::Light),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Dark => write!(f, "DARK"),
            Color::Light => write!(f, "LIGHT"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_is_self_inverse() {
        assert_eq!(Color::Dark.other(), Color::Light);
        assert_eq!(Color::Light.other(), Color::Dark);
        assert_eq!(Color::Dark.other().other(), Color::Dark);
    }

    #[test]
    fn test_token_round_trip() {
        assert_eq!(Color::Dark.token(), '#');
        assert_eq!(Color::Light.token(), '@');
        assert_eq!(Color::from_token('#'), Some(Color::Dark));
        assert_eq!(Color::from_token('@'), Some(Color::Light));
        assert_eq!(Color::from_token('x'), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Color::Dark.to_string(), "DARK");
        assert_eq!(Color::Light.to_string(), "LIGHT");
    }
}
