//! Background Refresh
//!
//! A shared game goes stale the moment the opponent moves. The refresh
//! loop polls the store on a fixed cadence and quietly swaps the held
//! session for a fresher one. Whoever owns the session keeps at most
//! one loop alive and cancels it when the session is replaced.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::game::session::Game;
use crate::storage::BoardStore;

/// Cadence of the background poll.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(2000);

/// The single active session of a front end, shared between command
/// handlers and the refresh loop.
///
/// Both sides hold the lock for a whole operation, so the handle only
/// ever steps from one fully-built session to the next.
pub type SessionHandle = Arc<Mutex<Option<Game>>>;

/// Cancellable background task keeping a [`SessionHandle`] fresh.
///
/// Dropping the value aborts the task; [`RefreshLoop::cancel`] also
/// waits for it to wind down.
pub struct RefreshLoop {
    handle: JoinHandle<()>,
}

impl RefreshLoop {
    /// Spawn a poll loop over `session`.
    ///
    /// The loop refreshes a live shared session non-strictly, once
    /// immediately and then every `cadence`, replacing the handle's
    /// contents with the result. It stops on its own when the session
    /// is gone, not shared, or finished. Store errors are logged and
    /// the tick is skipped; the next one tries again.
    pub fn spawn(session: SessionHandle, store: Arc<dyn BoardStore>, cadence: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval(cadence);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let mut guard = session.lock().await;
                let current = match guard.as_ref() {
                    Some(game) if game.is_shared() && !game.board().is_over() => game.clone(),
                    _ => break,
                };
                match current.refresh(store.as_ref(), false).await {
                    Ok(fresh) => {
                        let done = fresh.board().is_over();
                        *guard = Some(fresh);
                        if done {
                            break;
                        }
                    }
                    Err(err) => warn!(error = %err, "background refresh failed"),
                }
            }
            debug!("refresh loop finished");
        });
        Self { handle }
    }

    /// True once the loop stopped on its own.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the loop and wait for the task to be gone.
    pub async fn cancel(mut self) {
        self.handle.abort();
        // the JoinError from an abort is the expected outcome here
        let _ = (&mut self.handle).await;
    }
}

impl Drop for RefreshLoop {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// TESTS
// =============================================================================
