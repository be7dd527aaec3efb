//! Command Surface
//!
//! One command per line: the first token selects the command (case
//! insensitive), the rest are its arguments. Parsing resolves every
//! argument before any game state is touched, so a malformed line never
//! half-executes.
//!
//! The [`Controller`] executes parsed commands against the single
//! active session and keeps the background refresh loop alive exactly
//! while a live shared game is held.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::info;

use crate::core::color::Color;
use crate::core::coord::Coord;
use crate::game::refresh::{RefreshLoop, SessionHandle};
use crate::game::session::{Game, GameError};
use crate::game::ErrorKind;
use crate::storage::BoardStore;

// =============================================================================
// COMMANDS
// =============================================================================

/// A fully parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a game. A name makes it shared under that id.
    New {
        /// Color of the first move, owned by the creator when shared.
        first: Color,
        /// Store id for a shared game; `None` plays locally.
        name: Option<String>,
    },
    /// Place a disc.
    Play {
        /// Target cell.
        pos: Coord,
    },
    /// Join a shared game by id.
    Join {
        /// Store id of the game to join.
        name: String,
    },
    /// Forfeit the turn.
    Pass,
    /// Turn target highlighting on or off.
    Targets {
        /// The new flag value.
        show: bool,
    },
    /// Strict refresh of a shared game.
    Refresh,
    /// Reprint the board.
    Show,
    /// Leave the program.
    Exit,
}

impl Command {
    /// Parse one input line. Surplus tokens after the recognized
    /// arguments are ignored.
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let mut tokens = line.split_whitespace();
        let word = tokens.next().unwrap_or_default().to_ascii_uppercase();
        match word.as_str() {
            "NEW" => {
                let token = tokens.next().ok_or(CommandError::MissingGame)?;
                let first = parse_color(token)?;
                let name = tokens.next().map(str::to_string);
                Ok(Command::New { first, name })
            }
            "PLAY" => {
                let token = tokens.next().ok_or(CommandError::MissingArgument)?;
                let pos = token
                    .to_ascii_uppercase()
                    .parse::<Coord>()
                    .map_err(|_| CommandError::InvalidPosition(token.to_string()))?;
                Ok(Command::Play { pos })
            }
            "JOIN" => {
                let name = tokens.next().ok_or(CommandError::MissingGame)?;
                Ok(Command::Join {
                    name: name.to_string(),
                })
            }
            "PASS" => Ok(Command::Pass),
            "TARGETS" => {
                let token = tokens.next().ok_or(CommandError::MissingArgument)?;
                match token.to_ascii_uppercase().as_str() {
                    "ON" => Ok(Command::Targets { show: true }),
                    "OFF" => Ok(Command::Targets { show: false }),
                    _ => Err(CommandError::InvalidToggle(token.to_string())),
                }
            }
            "REFRESH" => Ok(Command::Refresh),
            "SHOW" => Ok(Command::Show),
            "EXIT" => Ok(Command::Exit),
            _ => Err(CommandError::UnknownCommand(word)),
        }
    }

    /// The usage line for a command word, when it names a command.
    pub fn usage_of(word: &str) -> Option<&'static str> {
        Some(match word.to_ascii_uppercase().as_str() {
            "NEW" => "Use: NEW (#|@) [<name>]",
            "PLAY" => "Use: PLAY <cell>",
            "JOIN" => "Use: JOIN <game>",
            "PASS" => "Use: PASS",
            "TARGETS" => "Use: TARGETS (ON|OFF)",
            "REFRESH" => "Use: REFRESH",
            "SHOW" => "Use: SHOW",
            "EXIT" => "Use: EXIT",
            _ => return None,
        })
    }
}

/// The color token of NEW: only the first character counts, so `#` and
/// `#something` both read as dark.
fn parse_color(token: &str) -> Result<Color, CommandError> {
    token
        .chars()
        .next()
        .and_then(Color::from_token)
        .ok_or_else(|| CommandError::InvalidPlayer(token.to_string()))
}

// =============================================================================
// ERRORS
// =============================================================================

/// Reasons a command line is refused.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The first token names no command.
    #[error("Invalid command {0}")]
    UnknownCommand(String),

    /// A required argument is absent.
    #[error("Missing argument")]
    MissingArgument,

    /// NEW or JOIN without a game argument.
    #[error("Missing game")]
    MissingGame,

    /// The cell argument is not board notation.
    #[error("Invalid position {0}")]
    InvalidPosition(String),

    /// The color argument starts with neither `#` nor `@`.
    #[error("Invalid player {0}")]
    InvalidPlayer(String),

    /// TARGETS takes ON or OFF, nothing else.
    #[error("Invalid argument {0}")]
    InvalidToggle(String),

    /// A command that needs a session found none.
    #[error("Game not started")]
    NoGame,

    /// The game layer refused the operation.
    #[error(transparent)]
    Game(#[from] GameError),
}

impl CommandError {
    /// Classify for presentation. Argument errors earn a usage hint.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::UnknownCommand(_)
            | CommandError::MissingArgument
            | CommandError::MissingGame
            | CommandError::InvalidPosition(_)
            | CommandError::InvalidPlayer(_)
            | CommandError::InvalidToggle(_) => ErrorKind::InvalidArgument,
            CommandError::NoGame => ErrorKind::InvalidState,
            CommandError::Game(err) => err.kind(),
        }
    }
}

/// What the front end should do after a successful command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going; show the session if one exists.
    Continue,
    /// EXIT was requested.
    Quit,
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Executes commands against the single active session.
///
/// The session lives in a [`SessionHandle`] shared with the refresh
/// loop; the controller owns at most one loop and restarts or cancels
/// it whenever the session changes shape.
pub struct Controller {
    session: SessionHandle,
    store: Arc<dyn BoardStore>,
    poll: Option<RefreshLoop>,
    cadence: Duration,
}

impl Controller {
    /// Controller with no session yet, polling shared games every
    /// `cadence`.
    pub fn new(store: Arc<dyn BoardStore>, cadence: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(None)),
            store,
            poll: None,
            cadence,
        }
    }

    /// Execute one parsed command.
    pub async fn execute(&mut self, cmd: Command) -> Result<Outcome, CommandError> {
        match cmd {
            Command::New { first, name } => {
                let game = match name {
                    Some(name) => {
                        Game::create_shared(name, first, self.store.as_ref()).await?
                    }
                    None => Game::solitaire(first),
                };
                self.replace(Some(game)).await;
                Ok(Outcome::Continue)
            }
            Command::Join { name } => {
                let game = Game::join(name, self.store.as_ref()).await?;
                self.replace(Some(game)).await;
                Ok(Outcome::Continue)
            }
            Command::Play { pos } => {
                {
                    let mut guard = self.session.lock().await;
                    let game = guard.as_ref().ok_or(CommandError::NoGame)?;
                    let next = game.play(pos, self.store.as_ref()).await?;
                    *guard = Some(next);
                }
                self.ensure_polling().await;
                Ok(Outcome::Continue)
            }
            Command::Pass => {
                {
                    let mut guard = self.session.lock().await;
                    let game = guard.as_ref().ok_or(CommandError::NoGame)?;
                    let next = game.pass(self.store.as_ref()).await?;
                    *guard = Some(next);
                }
                self.ensure_polling().await;
                Ok(Outcome::Continue)
            }
            Command::Targets { show } => {
                {
                    let mut guard = self.session.lock().await;
                    let game = guard.as_ref().ok_or(CommandError::NoGame)?;
                    let next = game.set_targets(show, self.store.as_ref()).await?;
                    *guard = Some(next);
                }
                Ok(Outcome::Continue)
            }
            Command::Refresh => {
                {
                    let mut guard = self.session.lock().await;
                    let game = guard.as_ref().ok_or(CommandError::NoGame)?;
                    let next = game.refresh(self.store.as_ref(), true).await?;
                    *guard = Some(next);
                }
                self.ensure_polling().await;
                Ok(Outcome::Continue)
            }
            Command::Show => {
                let guard = self.session.lock().await;
                guard.as_ref().ok_or(CommandError::NoGame)?;
                Ok(Outcome::Continue)
            }
            Command::Exit => Ok(Outcome::Quit),
        }
    }

    /// Snapshot of the current session for rendering.
    pub async fn session(&self) -> Option<Game> {
        self.session.lock().await.clone()
    }

    /// True while a background poll is running.
    pub fn is_polling(&self) -> bool {
        self.poll.as_ref().is_some_and(|poll| !poll.is_finished())
    }

    /// Cancel the poll loop before the front end goes away.
    pub async fn shutdown(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.cancel().await;
        }
        info!("controller shut down");
    }

    /// Install a new session and restart polling for it.
    async fn replace(&mut self, game: Option<Game>) {
        // cancel first so the old loop never writes over the new session
        if let Some(poll) = self.poll.take() {
            poll.cancel().await;
        }
        *self.session.lock().await = game;
        self.ensure_polling().await;
    }

    /// Keep exactly one poll loop alive while the session is a live
    /// shared game, none otherwise.
    async fn ensure_polling(&mut self) {
        let wants = {
            let guard = self.session.lock().await;
            matches!(
                guard.as_ref(),
                Some(game) if game.is_shared() && !game.board().is_over()
            )
        };
        let running = self.poll.as_ref().is_some_and(|poll| !poll.is_finished());
        if wants && running {
            return;
        }
        if let Some(poll) = self.poll.take() {
            poll.cancel().await;
        }
        if wants {
            self.poll = Some(RefreshLoop::spawn(
                self.session.clone(),
                self.store.clone(),
                self.cadence,
            ));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
