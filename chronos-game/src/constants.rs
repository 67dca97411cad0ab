//! Centralized balance and timing constants for the Chronos engine.
//!
//! `GameConfig::default()` is built from these values; tests and the tester
//! harness may override them through configuration, never by editing the
//! world content.

// Timing -------------------------------------------------------------------
pub const TICK_INTERVAL_MS: u64 = 100;
pub const LOCATION_TIME_LIMIT_SECS: f64 = 120.0;
/// Upper bound on real time credited by a single tick or a resume.
pub const MAX_CATCH_UP_SECS: f64 = 10.0;

// Persistence --------------------------------------------------------------
pub const STORAGE_KEY: &str = "timeTravelGameStateV1";

// Scoring ------------------------------------------------------------------
pub const STARTING_HEALTH: i32 = 100;
pub const MAX_HEALTH: i32 = 100;
pub const KEY_POINTS: u64 = 1_000;
pub const ANSWER_POINTS: u64 = 500;
pub const VAULT_BONUS: u64 = 10_000;
pub const WRONG_ANSWER_PENALTY: i32 = 10;
pub const REQUIRED_KEY_COUNT: usize = 3;

// World generation ---------------------------------------------------------
pub(crate) const PORTAL_STREAM_TAG: &[u8] = b"portals";
pub(crate) const EFFECT_STREAM_TAG: &[u8] = b"effects";
