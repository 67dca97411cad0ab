//! Async tick driver for hosts that run a tokio current-thread runtime.
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::{Instant, MissedTickBehavior};

use crate::GameStorage;
use crate::clock::Clock;
use crate::outcome::StatsReporter;
use crate::session::GameSession;
use crate::tick::TickOutcome;

/// Wall clock backed by tokio's time source, so paused test time drives it.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
    epoch_ms: i64,
}

impl TokioClock {
    /// Clock reading `epoch_ms` now and advancing with tokio time.
    #[must_use]
    pub fn starting_at(epoch_ms: i64) -> Self {
        Self {
            origin: Instant::now(),
            epoch_ms,
        }
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> i64 {
        let elapsed = i64::try_from(self.origin.elapsed().as_millis()).unwrap_or(i64::MAX);
        self.epoch_ms.saturating_add(elapsed)
    }
}

/// Why [`run_ticker`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerExit {
    /// The session became inactive.
    SessionEnded,
    /// The shutdown signal fired or its sender was dropped.
    Shutdown,
}

/// Tick `session` every `tick_interval_ms` until it ends or `shutdown` fires.
pub async fn run_ticker<S, C, R>(
    session: Rc<RefCell<GameSession<S, C, R>>>,
    mut shutdown: oneshot::Receiver<()>,
) -> TickerExit
where
    S: GameStorage,
    C: Clock,
    R: StatsReporter,
{
    let period = Duration::from_millis(session.borrow().tick_interval_ms().max(1));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the session already starts "now".
    interval.tick().await;

    loop {
        if !session.borrow().is_active() {
            return TickerExit::SessionEnded;
        }
        tokio::select! {
            _ = &mut shutdown => {
                log::debug!("ticker shut down");
                return TickerExit::Shutdown;
            }
            _ = interval.tick() => {
                let outcome = session.borrow_mut().tick();
                if matches!(outcome, TickOutcome::TimedOut(_) | TickOutcome::Inactive) {
                    return TickerExit::SessionEnded;
                }
            }
        }
    }
}
