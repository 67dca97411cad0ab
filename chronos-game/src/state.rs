use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

use crate::config::GameConfig;
use crate::constants::REQUIRED_KEY_COUNT;
use crate::world::{KeyKind, LocationId};

/// Collected keys in pickup order; never holds duplicates.
pub type KeyRing = SmallVec<[KeyKind; REQUIRED_KEY_COUNT]>;

fn default_health() -> i32 {
    crate::constants::STARTING_HEALTH
}

const fn default_active() -> bool {
    true
}

const fn default_location() -> LocationId {
    LocationId::CentralHub
}

/// The single mutable aggregate describing one play session.
///
/// Field names serialize in camelCase so the persisted slot keeps the
/// `timeTravelGameStateV1` layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default = "default_health")]
    pub health: i32,
    #[serde(default, deserialize_with = "lenient_keys")]
    pub keys: KeyRing,
    #[serde(default = "default_location", deserialize_with = "lenient_location")]
    pub location: LocationId,
    /// In-fiction seconds; runs backwards inside a reverse location.
    #[serde(default)]
    pub game_time: f64,
    /// Real seconds played, never dilated.
    #[serde(default)]
    pub constant_game_time: f64,
    /// Real seconds left before the current special location times out.
    #[serde(default)]
    pub location_timer: f64,
    #[serde(default)]
    pub awaiting_answer: bool,
    #[serde(default)]
    pub current_question: Option<String>,
    /// Location whose riddle the pending question belongs to.
    #[serde(default, deserialize_with = "lenient_optional_location")]
    pub question_location: Option<LocationId>,
    #[serde(default, deserialize_with = "lenient_locations")]
    pub visited_locations: Vec<LocationId>,
    #[serde(default, deserialize_with = "lenient_locations")]
    pub answered_questions: Vec<LocationId>,
    #[serde(default = "default_active")]
    pub game_active: bool,
    #[serde(default)]
    pub score: u64,
    /// Wall-clock milliseconds of the last applied tick.
    #[serde(default)]
    pub last_tick_time: Option<i64>,
    #[serde(default)]
    pub world_seed: Option<u64>,
}

impl GameState {
    /// Fresh state at the hub.
    #[must_use]
    pub fn fresh(config: &GameConfig, now_ms: i64) -> Self {
        Self {
            health: config.scoring.starting_health,
            keys: KeyRing::new(),
            location: LocationId::CentralHub,
            game_time: 0.0,
            constant_game_time: 0.0,
            location_timer: 0.0,
            awaiting_answer: false,
            current_question: None,
            question_location: None,
            visited_locations: vec![LocationId::CentralHub],
            answered_questions: Vec::new(),
            game_active: true,
            score: 0,
            last_tick_time: Some(now_ms),
            world_seed: None,
        }
    }

    #[must_use]
    pub fn with_world_seed(mut self, seed: u64) -> Self {
        self.world_seed = Some(seed);
        self
    }

    #[must_use]
    pub fn has_key(&self, key: KeyKind) -> bool {
        self.keys.contains(&key)
    }

    /// Membership check over every required key, independent of pickup order.
    #[must_use]
    pub fn has_all_keys(&self) -> bool {
        KeyKind::ALL.iter().all(|key| self.has_key(*key))
    }

    #[must_use]
    pub fn keys_needed(&self) -> usize {
        KeyKind::ALL
            .iter()
            .filter(|key| !self.has_key(**key))
            .count()
    }

    /// Add a key; returns `false` if it was already held.
    pub fn add_key(&mut self, key: KeyKind) -> bool {
        if self.has_key(key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn mark_visited(&mut self, id: LocationId) {
        if !self.visited_locations.contains(&id) {
            self.visited_locations.push(id);
        }
    }

    pub fn record_answer(&mut self, id: LocationId) {
        if !self.answered_questions.contains(&id) {
            self.answered_questions.push(id);
        }
    }

    /// Open the question gate for `location`.
    pub fn ask(&mut self, location: LocationId, prompt: &str) {
        self.awaiting_answer = true;
        self.current_question = Some(prompt.to_string());
        self.question_location = Some(location);
    }

    pub fn clear_question(&mut self) {
        self.awaiting_answer = false;
        self.current_question = None;
        self.question_location = None;
    }

    /// Whether the player stands in a location with a running countdown.
    #[must_use]
    pub const fn in_timed_location(&self) -> bool {
        self.location.is_timed()
    }

    #[must_use]
    pub fn keys_label(&self) -> String {
        if self.keys.is_empty() {
            return "None".to_string();
        }
        self.keys
            .iter()
            .map(|key| key.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[must_use]
    pub fn visited_label(&self) -> String {
        self.visited_locations
            .iter()
            .map(|id| id.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::fresh(&GameConfig::default(), 0)
    }
}

fn lenient_location<'de, D>(deserializer: D) -> Result<LocationId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(|name| {
            let id = LocationId::from_name(name);
            if id.is_none() {
                log::warn!("saved location {name:?} is unknown; returning to the hub");
            }
            id
        })
        .unwrap_or(LocationId::CentralHub))
}

fn lenient_optional_location<'de, D>(deserializer: D) -> Result<Option<LocationId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(LocationId::from_name))
}

fn lenient_locations<'de, D>(deserializer: D) -> Result<Vec<LocationId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    let mut ids = Vec::with_capacity(raw.len());
    for name in &raw {
        match LocationId::from_name(name) {
            Some(id) if !ids.contains(&id) => ids.push(id),
            Some(_) => {}
            None => log::warn!("dropping unknown saved location {name:?}"),
        }
    }
    Ok(ids)
}

fn lenient_keys<'de, D>(deserializer: D) -> Result<KeyRing, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    let mut keys = KeyRing::new();
    for name in &raw {
        match KeyKind::from_name(name) {
            Some(key) if !keys.contains(&key) => keys.push(key),
            Some(_) => {}
            None => log::warn!("dropping unknown saved key {name:?}"),
        }
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_starts_at_hub() {
        let state = GameState::fresh(&GameConfig::default(), 42);
        assert_eq!(state.health, 100);
        assert!(state.keys.is_empty());
        assert_eq!(state.location, LocationId::CentralHub);
        assert!(state.game_active);
        assert!(state.game_time.abs() < f64::EPSILON);
        assert!(state.location_timer.abs() < f64::EPSILON);
        assert_eq!(state.last_tick_time, Some(42));
        assert_eq!(state.visited_locations, vec![LocationId::CentralHub]);
    }

    #[test]
    fn keys_behave_as_an_ordered_set() {
        let mut state = GameState::default();
        assert!(state.add_key(KeyKind::Forest));
        assert!(state.add_key(KeyKind::Triangle));
        assert!(!state.add_key(KeyKind::Forest));
        assert_eq!(state.keys.as_slice(), &[KeyKind::Forest, KeyKind::Triangle]);
        assert_eq!(state.keys_needed(), 1);
        assert!(!state.has_all_keys());
        assert!(state.add_key(KeyKind::Stone));
        assert!(state.has_all_keys());
        assert_eq!(state.keys_label(), "Forest Key, Triangle Key, Stone Key");
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let state = GameState::default();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["location"], "Central Hub");
        assert!(json.get("constantGameTime").is_some());
        assert!(json.get("visitedLocations").is_some());
        assert_eq!(json["gameActive"], true);
    }

    #[test]
    fn legacy_payload_without_new_fields_loads() {
        let json = r#"{
            "health": 70,
            "keys": ["Stone Key", "Moon Key", "Stone Key"],
            "location": "Stonehenge",
            "gameTime": 12.5,
            "constantGameTime": 30,
            "locationTimer": 90,
            "timeEffect": "decelerated",
            "awaitingAnswer": false,
            "currentQuestion": null,
            "visitedLocations": ["Central Hub", "Stonehenge", "Narnia"],
            "gameActive": true,
            "score": 1500,
            "lastTickTime": 1700000000000
        }"#;
        let state: GameState = serde_json::from_str(json).unwrap();
        assert_eq!(state.health, 70);
        assert_eq!(state.keys.as_slice(), &[KeyKind::Stone]);
        assert_eq!(state.location, LocationId::Stonehenge);
        assert_eq!(
            state.visited_locations,
            vec![LocationId::CentralHub, LocationId::Stonehenge]
        );
        assert_eq!(state.world_seed, None);
        assert!(state.answered_questions.is_empty());
    }

    #[test]
    fn unknown_location_falls_back_to_hub() {
        let state: GameState =
            serde_json::from_str(r#"{"location": "Lost City", "health": 100}"#).unwrap();
        assert_eq!(state.location, LocationId::CentralHub);
        assert!(state.game_active);
    }

    #[test]
    fn question_gate_opens_and_clears() {
        let mut state = GameState::default();
        state.ask(LocationId::Stonehenge, "How many?");
        assert!(state.awaiting_answer);
        assert_eq!(state.question_location, Some(LocationId::Stonehenge));
        state.clear_question();
        assert!(!state.awaiting_answer);
        assert_eq!(state.current_question, None);
        assert_eq!(state.question_location, None);
    }
}
