//! Reversi
//!
//! Line-oriented front end over the reversi library. One command per
//! line drives a single active game; shared games live as JSON
//! documents in a directory and are polled in the background while the
//! other player thinks.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use reversi::storage::FileStore;
use reversi::ui::{render_session, Command, CommandError, Controller, Outcome};
use reversi::{ErrorKind, REFRESH_INTERVAL, VERSION};

/// Front end settings.
struct Config {
    /// Directory holding one JSON document per shared game.
    games_dir: PathBuf,
    /// How often the background loop polls for the other player's moves.
    cadence: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            games_dir: PathBuf::from("games"),
            cadence: REFRESH_INTERVAL,
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied.
    fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(dir) = std::env::var("REVERSI_GAMES_DIR") {
            config.games_dir = PathBuf::from(dir);
        }
        if let Ok(millis) = std::env::var("REVERSI_REFRESH_MS") {
            if let Ok(millis) = millis.parse::<u64>() {
                config.cadence = Duration::from_millis(millis.max(1));
            }
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never tangle with the board output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let store = FileStore::open(config.games_dir.clone())
        .await
        .with_context(|| format!("Cannot open games directory {:?}", config.games_dir))?;
    debug!(dir = %store.dir().display(), cadence_ms = config.cadence.as_millis() as u64, "store ready");
    let mut controller = Controller::new(Arc::new(store), config.cadence);

    println!("Reversi {VERSION}");
    println!("Commands: NEW PLAY JOIN PASS TARGETS REFRESH SHOW EXIT");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match run_line(&mut controller, &line).await {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Continue) => {
                if let Some(game) = controller.session().await {
                    print!("{}", render_session(&game));
                }
            }
            Err(err) => report(&line, &err),
        }
    }

    println!("Bye.");
    controller.shutdown().await;
    Ok(())
}

async fn run_line(controller: &mut Controller, line: &str) -> Result<Outcome, CommandError> {
    let cmd = Command::parse(line)?;
    controller.execute(cmd).await
}

/// Print the failure, plus the usage line when the arguments were at
/// fault and the command word is known.
fn report(line: &str, err: &CommandError) {
    println!("{err}");
    if err.kind() == ErrorKind::InvalidArgument {
        if let Some(usage) = line.split_whitespace().next().and_then(Command::usage_of) {
            println!("{usage}");
        }
    }
}
