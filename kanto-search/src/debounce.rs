//! Input debouncing.
//!
//! Rapid keystrokes must not each trigger a resolution; only a value that
//! has been stable for the full window is ever handed downstream. Earlier
//! pending firings are superseded by each new change, so at most one value
//! per quiet period comes out.

use std::time::Duration;

use tokio::sync::watch;
use tracing::trace;

/// Debounces a watched input value.
///
/// Holds the receiving half of a `watch` channel; the producer side pushes
/// every raw change.
pub struct Debouncer {
    rx: watch::Receiver<String>,
    window: Duration,
}

impl Debouncer {
    pub fn new(rx: watch::Receiver<String>, window: Duration) -> Self {
        Self { rx, window }
    }

    /// The debounce window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait for the next value that stays unchanged for the whole window
    /// and return it. Intermediate values are absorbed and never returned.
    ///
    /// Returns `None` once the producer side is gone.
    pub async fn next_stable(&mut self) -> Option<String> {
        self.rx.changed().await.ok()?;
        loop {
            let current = self.rx.borrow_and_update().clone();
            tokio::select! {
                changed = self.rx.changed() => {
                    changed.ok()?;
                    trace!("input changed within window, restarting debounce");
                }
                _ = tokio::time::sleep(self.window) => {
                    trace!(input = %current, "input stable, releasing");
                    return Some(current);
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
