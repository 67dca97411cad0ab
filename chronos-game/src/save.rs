//! Save/resume codec for the single persisted slot.
//!
//! The slot holds a camelCase JSON snapshot of [`GameState`]. Loading credits
//! the real time that passed while the page was closed (capped like a tick),
//! rebuilds the world the snapshot was played in, and repairs anything an
//! older or hand-edited snapshot left inconsistent.
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use thiserror::Error;

use crate::GameStorage;
use crate::config::GameConfig;
use crate::state::GameState;
use crate::tick::{elapsed_secs, time_multiplier};
use crate::world::World;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend failed: {0}")]
    Backend(String),
    #[error("save slot is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    fn backend(err: impl std::error::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Where a loaded state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// The slot was empty.
    Fresh,
    /// A snapshot was restored.
    Resumed,
    /// The slot was unreadable and a fresh state was used instead.
    Recovered,
}

/// Serialize a state for the slot.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_snapshot(state: &GameState) -> Result<String, StorageError> {
    Ok(serde_json::to_string(state)?)
}

/// Parse a slot payload without reconciling it.
///
/// # Errors
///
/// Returns an error if the payload is not a valid snapshot.
pub fn decode_snapshot(raw: &str) -> Result<GameState, StorageError> {
    Ok(serde_json::from_str(raw)?)
}

/// Read and parse the slot.
///
/// # Errors
///
/// Returns an error if the backend fails or the payload cannot be parsed.
pub fn load_snapshot<S: GameStorage>(
    storage: &S,
    config: &GameConfig,
) -> Result<Option<GameState>, StorageError> {
    storage
        .load_raw(&config.storage_key)
        .map_err(StorageError::backend)?
        .map(|raw| decode_snapshot(&raw))
        .transpose()
}

/// Bring a snapshot up to `now_ms` and align `world` with it.
///
/// Answered riddles are re-applied so answer points stay one-shot across
/// reloads, and a pending question gate is repaired if its riddle is gone.
pub fn reconcile(
    mut state: GameState,
    world: &mut World,
    config: &GameConfig,
    now_ms: i64,
) -> GameState {
    match state.world_seed {
        Some(seed) if seed != world.seed() => *world = World::build(seed),
        Some(_) => {}
        None => state.world_seed = Some(world.seed()),
    }
    for id in state.answered_questions.clone() {
        world.mark_answered(id);
    }

    let elapsed = elapsed_secs(state.last_tick_time, now_ms, config.max_catch_up_secs);
    state.game_time += elapsed * time_multiplier(&state, world);
    if state.in_timed_location() {
        state.location_timer = (state.location_timer - elapsed).max(0.0);
    }
    state.constant_game_time += elapsed;
    state.last_tick_time = Some(now_ms);

    repair_question_gate(&mut state, world);
    let here = state.location;
    state.mark_visited(here);
    state
}

fn repair_question_gate(state: &mut GameState, world: &World) {
    if !state.awaiting_answer {
        state.current_question = None;
        state.question_location = None;
        return;
    }
    let target = state.question_location.unwrap_or(state.location);
    match world.location(target).riddle.as_ref() {
        Some(riddle) if !riddle.answered => state.ask(target, riddle.prompt),
        _ => {
            log::warn!("saved question gate for {target} has no open riddle; clearing it");
            state.clear_question();
        }
    }
}

/// Load the session state, falling back to a fresh one.
///
/// `world` is replaced by the snapshot's world when the snapshot names a
/// different seed. Backend and parse failures are logged and never surface.
pub fn load<S: GameStorage>(
    storage: &S,
    world: &mut World,
    config: &GameConfig,
    now_ms: i64,
) -> (GameState, LoadSource) {
    let seed = world.seed();
    let fresh = || GameState::fresh(config, now_ms).with_world_seed(seed);
    match load_snapshot(storage, config) {
        Ok(Some(snapshot)) => {
            let state = reconcile(snapshot, world, config, now_ms);
            log::debug!(
                "resumed save at {} (active={}, score={})",
                state.location,
                state.game_active,
                state.score
            );
            (state, LoadSource::Resumed)
        }
        Ok(None) => (fresh(), LoadSource::Fresh),
        Err(err) => {
            log::warn!("discarding unreadable save: {err}");
            (fresh(), LoadSource::Recovered)
        }
    }
}

/// Overwrite the slot with `state`.
///
/// # Errors
///
/// Returns an error if serialization or the backend write fails.
pub fn save<S: GameStorage>(
    storage: &S,
    config: &GameConfig,
    state: &GameState,
) -> Result<(), StorageError> {
    let payload = encode_snapshot(state)?;
    storage
        .save_raw(&config.storage_key, &payload)
        .map_err(StorageError::backend)
}

/// Remove the slot.
///
/// # Errors
///
/// Returns an error if the backend delete fails.
pub fn clear<S: GameStorage>(storage: &S, config: &GameConfig) -> Result<(), StorageError> {
    storage
        .delete_save(&config.storage_key)
        .map_err(StorageError::backend)
}

/// In-memory slot store shared by clones; used by tests and the tester.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw payload currently stored under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    /// Store an arbitrary payload, bypassing the codec.
    pub fn put_raw(&self, key: &str, payload: impl Into<String>) {
        self.slots.borrow_mut().insert(key.to_string(), payload.into());
    }
}

impl GameStorage for MemoryStorage {
    type Error = Infallible;

    fn load_raw(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.raw(key))
    }

    fn save_raw(&self, key: &str, payload: &str) -> Result<(), Self::Error> {
        self.put_raw(key, payload);
        Ok(())
    }

    fn delete_save(&self, key: &str) -> Result<(), Self::Error> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{KeyKind, LocationId, TimeEffect};

    #[derive(Debug, Error)]
    #[error("quota exceeded")]
    struct QuotaExceeded;

    struct BrokenStorage;

    impl GameStorage for BrokenStorage {
        type Error = QuotaExceeded;

        fn load_raw(&self, _key: &str) -> Result<Option<String>, Self::Error> {
            Err(QuotaExceeded)
        }

        fn save_raw(&self, _key: &str, _payload: &str) -> Result<(), Self::Error> {
            Err(QuotaExceeded)
        }

        fn delete_save(&self, _key: &str) -> Result<(), Self::Error> {
            Err(QuotaExceeded)
        }
    }

    fn special_with(world: &World, effect: TimeEffect) -> LocationId {
        LocationId::SPECIAL
            .into_iter()
            .find(|id| world.location(*id).time_effect == effect)
            .unwrap()
    }

    #[test]
    fn empty_slot_yields_fresh_state() {
        let storage = MemoryStorage::new();
        let cfg = GameConfig::default();
        let mut world = World::build(11);
        let (state, source) = load(&storage, &mut world, &cfg, 5_000);
        assert_eq!(source, LoadSource::Fresh);
        assert_eq!(state.health, 100);
        assert_eq!(state.location, LocationId::CentralHub);
        assert_eq!(state.world_seed, Some(11));
        assert_eq!(state.last_tick_time, Some(5_000));
    }

    #[test]
    fn corrupt_slot_recovers_with_fresh_state() {
        let storage = MemoryStorage::new();
        let cfg = GameConfig::default();
        storage.put_raw(&cfg.storage_key, "{\"health\": 7");
        let mut world = World::build(1);
        let (state, source) = load(&storage, &mut world, &cfg, 0);
        assert_eq!(source, LoadSource::Recovered);
        assert_eq!(state.health, 100);
    }

    #[test]
    fn backend_failure_recovers_and_surfaces_on_write() {
        let cfg = GameConfig::default();
        let mut world = World::build(1);
        let (_, source) = load(&BrokenStorage, &mut world, &cfg, 0);
        assert_eq!(source, LoadSource::Recovered);
        let err = save(&BrokenStorage, &cfg, &GameState::default()).unwrap_err();
        assert!(matches!(err, StorageError::Backend(msg) if msg == "quota exceeded"));
        assert!(clear(&BrokenStorage, &cfg).is_err());
    }

    #[test]
    fn resume_credits_capped_elapsed_time_with_location_effect() {
        let cfg = GameConfig::default();
        let mut world = World::build(21);
        let slow = special_with(&world, TimeEffect::Decelerated);
        let mut saved = GameState::fresh(&cfg, 1_000).with_world_seed(21);
        saved.location = slow;
        saved.location_timer = 60.0;
        saved.game_time = 100.0;

        let resumed = reconcile(saved, &mut world, &cfg, 1_000 + 45_000);
        assert!((resumed.constant_game_time - 10.0).abs() < 1e-9);
        assert!((resumed.game_time - 105.0).abs() < 1e-9);
        assert!((resumed.location_timer - 50.0).abs() < 1e-9);
        assert_eq!(resumed.last_tick_time, Some(46_000));
    }

    #[test]
    fn resume_at_hub_leaves_timer_alone() {
        let cfg = GameConfig::default();
        let mut world = World::build(2);
        let mut saved = GameState::fresh(&cfg, 0).with_world_seed(2);
        saved.location_timer = 33.0;
        let resumed = reconcile(saved, &mut world, &cfg, 4_000);
        assert!((resumed.game_time - 4.0).abs() < 1e-9);
        assert!((resumed.location_timer - 33.0).abs() < 1e-9);
    }

    #[test]
    fn clock_running_backwards_credits_nothing() {
        let cfg = GameConfig::default();
        let mut world = World::build(2);
        let saved = GameState::fresh(&cfg, 10_000).with_world_seed(2);
        let resumed = reconcile(saved, &mut world, &cfg, 2_000);
        assert!(resumed.constant_game_time.abs() < f64::EPSILON);
        assert_eq!(resumed.last_tick_time, Some(2_000));
    }

    #[test]
    fn resume_rebuilds_saved_world_and_answers() {
        let cfg = GameConfig::default();
        let mut saved = GameState::fresh(&cfg, 0).with_world_seed(404);
        saved.record_answer(LocationId::Stonehenge);
        let mut world = World::build(1);
        let resumed = reconcile(saved, &mut world, &cfg, 0);
        assert_eq!(world.seed(), 404);
        assert_eq!(world, {
            let mut expected = World::build(404);
            expected.mark_answered(LocationId::Stonehenge);
            expected
        });
        assert!(!world.location(LocationId::Stonehenge).question_pending());
        assert_eq!(resumed.world_seed, Some(404));
    }

    #[test]
    fn legacy_gate_without_location_uses_current_riddle() {
        let cfg = GameConfig::default();
        let mut world = World::build(3);
        let mut saved = GameState::fresh(&cfg, 0);
        saved.location = LocationId::CrookedForest;
        saved.awaiting_answer = true;
        saved.current_question = Some("stale".into());
        let resumed = reconcile(saved, &mut world, &cfg, 0);
        assert!(resumed.awaiting_answer);
        assert_eq!(resumed.question_location, Some(LocationId::CrookedForest));
        assert_eq!(
            resumed.current_question.as_deref(),
            Some("In which country is the famous Crooked Forest located?")
        );
    }

    #[test]
    fn gate_on_answered_riddle_is_cleared() {
        let cfg = GameConfig::default();
        let mut world = World::build(3);
        let mut saved = GameState::fresh(&cfg, 0).with_world_seed(3);
        saved.ask(LocationId::Stonehenge, "How many stones form the main circle of Stonehenge?");
        saved.record_answer(LocationId::Stonehenge);
        let resumed = reconcile(saved, &mut world, &cfg, 0);
        assert!(!resumed.awaiting_answer);
        assert_eq!(resumed.question_location, None);
    }

    #[test]
    fn save_then_load_with_no_elapsed_time_round_trips() {
        let storage = MemoryStorage::new();
        let cfg = GameConfig::default();
        let mut world = World::build(77);
        let mut state = GameState::fresh(&cfg, 9_000).with_world_seed(77);
        state.add_key(KeyKind::Forest);
        state.score = 1_500;
        state.health = 80;
        state.game_time = -12.25;
        state.mark_visited(LocationId::CrookedForest);
        save(&storage, &cfg, &state).unwrap();

        let (loaded, source) = load(&storage, &mut world, &cfg, 9_000);
        assert_eq!(source, LoadSource::Resumed);
        assert_eq!(loaded, state);

        clear(&storage, &cfg).unwrap();
        assert!(storage.raw(&cfg.storage_key).is_none());
    }
}
