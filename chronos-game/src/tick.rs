//! Real-time tick engine: advances the game clocks and the location countdown.
use crate::config::GameConfig;
use crate::state::GameState;
use crate::world::World;

/// Real and fictional seconds credited by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickDelta {
    pub real_secs: f64,
    pub game_secs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Session already over; nothing was applied.
    Inactive,
    Advanced(TickDelta),
    /// The location countdown hit zero on this tick and the session ended.
    TimedOut(TickDelta),
}

impl TickOutcome {
    #[must_use]
    pub const fn delta(self) -> Option<TickDelta> {
        match self {
            Self::Inactive => None,
            Self::Advanced(delta) | Self::TimedOut(delta) => Some(delta),
        }
    }
}

/// Real seconds elapsed since `last_ms`, clamped to `[0, cap]`.
///
/// A missing timestamp credits nothing.
#[must_use]
pub fn elapsed_secs(last_ms: Option<i64>, now_ms: i64, cap: f64) -> f64 {
    let Some(last_ms) = last_ms else {
        return 0.0;
    };
    #[allow(clippy::cast_precision_loss)]
    let secs = now_ms.saturating_sub(last_ms) as f64 / 1000.0;
    secs.clamp(0.0, cap)
}

/// Multiplier for the player's current location; hub and vault run at normal speed.
#[must_use]
pub fn time_multiplier(state: &GameState, world: &World) -> f64 {
    if state.in_timed_location() {
        world.location(state.location).time_modifier()
    } else {
        1.0
    }
}

/// Apply one tick at wall-clock `now_ms`.
///
/// Always reads and writes the caller's latest state, so ticks compose in
/// firing order. On timeout the session is deactivated and the timer pinned
/// at zero; the caller owns the terminal transition.
pub fn advance(state: &mut GameState, world: &World, now_ms: i64, cfg: &GameConfig) -> TickOutcome {
    if !state.game_active {
        return TickOutcome::Inactive;
    }

    let real_secs = elapsed_secs(state.last_tick_time, now_ms, cfg.max_catch_up_secs);
    let game_secs = real_secs * time_multiplier(state, world);
    let delta = TickDelta {
        real_secs,
        game_secs,
    };

    state.game_time += game_secs;
    state.constant_game_time += real_secs;
    state.last_tick_time = Some(now_ms);

    if !state.in_timed_location() {
        return TickOutcome::Advanced(delta);
    }

    state.location_timer = (state.location_timer - real_secs).max(0.0);
    log::debug!(
        "{} timer at {:.1}s (game clock {:+.2}s)",
        state.location,
        state.location_timer,
        game_secs
    );
    if state.location_timer <= 0.0 {
        state.location_timer = 0.0;
        state.game_active = false;
        log::info!(
            "location timer expired in {} after {:.1}s of play",
            state.location,
            state.constant_game_time
        );
        return TickOutcome::TimedOut(delta);
    }
    TickOutcome::Advanced(delta)
}
