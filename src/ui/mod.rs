//! Text Front End
//!
//! The line-oriented surface of the crate: a command grammar with
//! usage hints, a controller tying commands to the active session and
//! its refresh loop, and plain-text board rendering.

pub mod command;
pub mod output;

pub use command::{Command, CommandError, Controller, Outcome};
pub use output::{render_board, render_session};
