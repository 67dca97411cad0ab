//! World model: the five locations, their exits, keys, riddles and time effects.
//!
//! The topology is fixed except for two independent draws made per world:
//! which special location sits behind each hub portal, and which time effect
//! each special location carries. Both draws come from RNG streams derived
//! from a single world seed, so a seed reproduces the exact same world.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{EFFECT_STREAM_TAG, PORTAL_STREAM_TAG};

/// Identifier of a location; serialized as its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LocationId {
    #[serde(rename = "Central Hub")]
    CentralHub,
    #[serde(rename = "Bermuda Triangle")]
    BermudaTriangle,
    #[serde(rename = "Stonehenge")]
    Stonehenge,
    #[serde(rename = "Crooked Forest")]
    CrookedForest,
    #[serde(rename = "Treasure Vault")]
    TreasureVault,
}

impl LocationId {
    pub const ALL: [Self; 5] = [
        Self::CentralHub,
        Self::BermudaTriangle,
        Self::Stonehenge,
        Self::CrookedForest,
        Self::TreasureVault,
    ];

    /// The three timed locations reachable through hub portals.
    pub const SPECIAL: [Self; 3] = [Self::BermudaTriangle, Self::Stonehenge, Self::CrookedForest];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CentralHub => "Central Hub",
            Self::BermudaTriangle => "Bermuda Triangle",
            Self::Stonehenge => "Stonehenge",
            Self::CrookedForest => "Crooked Forest",
            Self::TreasureVault => "Treasure Vault",
        }
    }

    /// Resolve a display name back to an identifier.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name.trim())
    }

    /// Whether the location runs a countdown (everything except hub and vault).
    #[must_use]
    pub const fn is_timed(self) -> bool {
        !matches!(self, Self::CentralHub | Self::TreasureVault)
    }

    const fn index(self) -> usize {
        match self {
            Self::CentralHub => 0,
            Self::BermudaTriangle => 1,
            Self::Stonehenge => 2,
            Self::CrookedForest => 3,
            Self::TreasureVault => 4,
        }
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Collectible keys; one per special location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyKind {
    #[serde(rename = "Triangle Key")]
    Triangle,
    #[serde(rename = "Stone Key")]
    Stone,
    #[serde(rename = "Forest Key")]
    Forest,
}

impl KeyKind {
    pub const ALL: [Self; 3] = [Self::Triangle, Self::Stone, Self::Forest];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Triangle => "Triangle Key",
            Self::Stone => "Stone Key",
            Self::Forest => "Forest Key",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name.trim())
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Movement commands. Declaration order is the order exits are listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Treasure,
}

impl Direction {
    /// Hub portals that lead to special locations.
    pub const PORTALS: [Self; 3] = [Self::North, Self::South, Self::East];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Treasure => "treasure",
        }
    }

    /// Parse a lowercase command word.
    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "north" => Some(Self::North),
            "south" => Some(Self::South),
            "east" => Some(Self::East),
            "west" => Some(Self::West),
            "treasure" => Some(Self::Treasure),
            _ => None,
        }
    }

    /// The direction leading back the way this one came.
    #[must_use]
    pub const fn reverse(self) -> Option<Self> {
        match self {
            Self::North => Some(Self::South),
            Self::South => Some(Self::North),
            Self::East => Some(Self::West),
            Self::West => Some(Self::East),
            Self::Treasure => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How fictional time flows relative to real time at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeEffect {
    Normal,
    Accelerated,
    Decelerated,
    Reverse,
}

impl TimeEffect {
    /// The effects dealt out to the special locations, one each.
    pub const SPECIAL: [Self; 3] = [Self::Accelerated, Self::Decelerated, Self::Reverse];

    /// Multiplier applied to real elapsed seconds.
    #[must_use]
    pub const fn modifier(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::Accelerated => 1.5,
            Self::Decelerated => 0.5,
            Self::Reverse => -1.0,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Accelerated => "ACCELERATED",
            Self::Decelerated => "DECELERATED",
            Self::Reverse => "REVERSE",
        }
    }
}

/// Question guarding entry to a special location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Riddle {
    pub prompt: &'static str,
    pub answer: &'static str,
    pub answered: bool,
}

impl Riddle {
    const fn new(prompt: &'static str, answer: &'static str) -> Self {
        Self {
            prompt,
            answer,
            answered: false,
        }
    }

    /// Case-insensitive substring match of the expected answer.
    #[must_use]
    pub fn accepts(&self, response: &str) -> bool {
        response
            .to_lowercase()
            .contains(&self.answer.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: LocationId,
    pub description: &'static str,
    pub welcome: &'static str,
    pub key: Option<KeyKind>,
    pub exits: BTreeMap<Direction, LocationId>,
    pub time_effect: TimeEffect,
    pub riddle: Option<Riddle>,
}

impl Location {
    fn blank(id: LocationId) -> Self {
        let (description, welcome, key, riddle) = match id {
            LocationId::CentralHub => (
                "A mystical nexus where time flows normally. Portals shimmer in all directions.",
                "🌟 Welcome to the Central Hub! Choose your time adventure wisely.",
                None,
                None,
            ),
            LocationId::BermudaTriangle => (
                "A mysterious triangular vortex where time bends unpredictably. Reality warps around you.",
                "🔺 Entering Bermuda Triangle! The currents of time twist around you.",
                Some(KeyKind::Triangle),
                Some(Riddle::new(
                    "What phenomenon is the Bermuda Triangle famous for?",
                    "disappearances",
                )),
            ),
            LocationId::Stonehenge => (
                "Ancient stone circles where time feels weighted by millennia.",
                "🗿 Welcome to Stonehenge! The old stones hum with temporal energy.",
                Some(KeyKind::Stone),
                Some(Riddle::new(
                    "How many stones form the main circle of Stonehenge?",
                    "30",
                )),
            ),
            LocationId::CrookedForest => (
                "A twisted woodland where every trunk bends as if time itself had leaned on it.",
                "🌲 Entering Crooked Forest! The trees creak with stolen moments.",
                Some(KeyKind::Forest),
                Some(Riddle::new(
                    "In which country is the famous Crooked Forest located?",
                    "poland",
                )),
            ),
            LocationId::TreasureVault => (
                "The legendary treasure vault, accessible only to those who have mastered time itself!",
                "💰 TREASURE VAULT UNLOCKED! Congratulations, Time Master!",
                None,
                None,
            ),
        };
        Self {
            id,
            description,
            welcome,
            key,
            exits: BTreeMap::new(),
            time_effect: TimeEffect::Normal,
            riddle,
        }
    }

    #[must_use]
    pub const fn has_question(&self) -> bool {
        self.riddle.is_some()
    }

    /// True while the location still guards entry with an unanswered riddle.
    #[must_use]
    pub fn question_pending(&self) -> bool {
        self.riddle.as_ref().is_some_and(|riddle| !riddle.answered)
    }

    #[must_use]
    pub const fn time_modifier(&self) -> f64 {
        self.time_effect.modifier()
    }

    #[must_use]
    pub fn exit(&self, direction: Direction) -> Option<LocationId> {
        self.exits.get(&direction).copied()
    }
}

/// A complete, independently randomized game world.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct World {
    seed: u64,
    locations: [Location; 5],
}

impl World {
    /// Build the world determined by `seed`.
    #[must_use]
    pub fn build(seed: u64) -> Self {
        let mut portal_rng = ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, PORTAL_STREAM_TAG));
        let mut effect_rng = ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, EFFECT_STREAM_TAG));

        let mut destinations = LocationId::SPECIAL;
        destinations.shuffle(&mut portal_rng);
        let mut effects = TimeEffect::SPECIAL;
        effects.shuffle(&mut effect_rng);

        let mut locations = LocationId::ALL.map(Location::blank);
        for (direction, destination) in Direction::PORTALS.into_iter().zip(destinations) {
            locations[LocationId::CentralHub.index()]
                .exits
                .insert(direction, destination);
            if let Some(back) = direction.reverse() {
                locations[destination.index()]
                    .exits
                    .insert(back, LocationId::CentralHub);
            }
        }
        for (special, effect) in LocationId::SPECIAL.into_iter().zip(effects) {
            locations[special.index()].time_effect = effect;
        }
        locations[LocationId::CentralHub.index()]
            .exits
            .insert(Direction::Treasure, LocationId::TreasureVault);

        log::debug!(
            "built world seed={seed} portals={destinations:?} effects={effects:?}",
        );
        Self { seed, locations }
    }

    /// Build a world from a freshly drawn random seed.
    #[must_use]
    pub fn unseeded() -> Self {
        Self::build(rand::random())
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.index()]
    }

    pub fn location_mut(&mut self, id: LocationId) -> &mut Location {
        &mut self.locations[id.index()]
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// Hub portal leading to `id`, if any.
    #[must_use]
    pub fn portal_to(&self, id: LocationId) -> Option<Direction> {
        self.location(LocationId::CentralHub)
            .exits
            .iter()
            .find_map(|(direction, dest)| (*dest == id).then_some(*direction))
    }

    /// Mark a riddle answered; returns `true` only on the first call.
    pub fn mark_answered(&mut self, id: LocationId) -> bool {
        match self.location_mut(id).riddle.as_mut() {
            Some(riddle) if !riddle.answered => {
                riddle.answered = true;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn questions_answered(&self) -> usize {
        self.locations
            .iter()
            .filter(|loc| loc.riddle.as_ref().is_some_and(|r| r.answered))
            .count()
    }
}

type HmacSha256 = Hmac<Sha256>;

fn derive_stream_seed(world_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so this branch is unreachable in practice.
    let Ok(mut mac) = HmacSha256::new_from_slice(&world_seed.to_le_bytes()) else {
        return world_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
