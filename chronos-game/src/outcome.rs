//! Terminal outcomes, the final statistics report and the stats collaborator seam.
use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::console::{Console, Tone};
use crate::constants::{MAX_HEALTH, REQUIRED_KEY_COUNT};
use crate::format::{format_clock, format_points};
use crate::state::GameState;
use crate::world::{KeyKind, LocationId, World};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    TimedOut,
}

impl Outcome {
    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Self::Won)
    }

    #[must_use]
    pub const fn notification(self) -> Notification {
        match self {
            Self::Won => Notification::Victory,
            Self::TimedOut => Notification::TimeUp,
        }
    }
}

/// Popup the UI should show after a terminal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Victory,
    TimeUp,
}

impl Notification {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Victory => "🏆 Victory!",
            Self::TimeUp => "⏰ Time's Up!",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Victory => {
                "You unlocked the Treasure Vault and mastered time itself. Congratulations, Time Master!"
            }
            Self::TimeUp => "The location timer ran out and the portal collapsed around you.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    MasterOfTime,
    TimeCollector,
    TimeSeeker,
    TimeNovice,
    TimeStudent,
}

impl Rank {
    /// Rank for a final score and key count.
    #[must_use]
    pub fn for_result(score: u64, keys: usize, config: &GameConfig) -> Self {
        if score >= config.scoring.vault_bonus {
            Self::MasterOfTime
        } else if keys >= REQUIRED_KEY_COUNT {
            Self::TimeCollector
        } else if keys >= 2 {
            Self::TimeSeeker
        } else if keys >= 1 {
            Self::TimeNovice
        } else {
            Self::TimeStudent
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::MasterOfTime => "Master of Time",
            Self::TimeCollector => "Time Collector",
            Self::TimeSeeker => "Time Seeker",
            Self::TimeNovice => "Time Novice",
            Self::TimeStudent => "Time Student",
        }
    }

    const fn banner(self) -> (&'static str, Tone) {
        match self {
            Self::MasterOfTime => ("🌟 RANK: MASTER OF TIME! Perfect completion!", Tone::Treasure),
            Self::TimeCollector => ("🎖 RANK: TIME COLLECTOR! All keys found!", Tone::Success),
            Self::TimeSeeker => ("🥉 RANK: TIME SEEKER! Good progress!", Tone::Success),
            Self::TimeNovice => ("🔰 RANK: TIME NOVICE! Keep exploring!", Tone::Success),
            Self::TimeStudent => (
                "📚 RANK: TIME STUDENT! Practice makes perfect!",
                Tone::Warning,
            ),
        }
    }
}

/// Final statistics for a session, computed from its current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalReport {
    pub score: u64,
    pub game_time: f64,
    pub constant_game_time: f64,
    pub health: i32,
    pub max_health: i32,
    pub keys: Vec<KeyKind>,
    pub visited: Vec<LocationId>,
    pub completion_pct: f64,
    pub points_per_key: u64,
    pub key_points: u64,
    pub questions_answered: usize,
    pub points_per_answer: u64,
    pub question_points: u64,
    pub vault_bonus: Option<u64>,
    pub rank: Rank,
}

impl FinalReport {
    #[must_use]
    pub fn from_state(state: &GameState, world: &World, config: &GameConfig) -> Self {
        let scoring = &config.scoring;
        let key_count = state.keys.len();
        let questions_answered = world.questions_answered();
        #[allow(clippy::cast_precision_loss)]
        let completion_pct = key_count as f64 / REQUIRED_KEY_COUNT as f64 * 100.0;
        Self {
            score: state.score,
            game_time: state.game_time,
            constant_game_time: state.constant_game_time,
            health: state.health,
            max_health: MAX_HEALTH,
            keys: state.keys.to_vec(),
            visited: state.visited_locations.clone(),
            completion_pct,
            points_per_key: scoring.key_points,
            key_points: key_count as u64 * scoring.key_points,
            questions_answered,
            points_per_answer: scoring.answer_points,
            question_points: questions_answered as u64 * scoring.answer_points,
            vault_bonus: (state.location == LocationId::TreasureVault)
                .then_some(scoring.vault_bonus),
            rank: Rank::for_result(state.score, key_count, config),
        }
    }

    /// One-decimal completion label, e.g. `66.7%`.
    #[must_use]
    pub fn completion_label(&self) -> String {
        format!("{:.1}%", self.completion_pct)
    }

    fn keys_label(&self) -> String {
        if self.keys.is_empty() {
            return "None".to_string();
        }
        self.keys
            .iter()
            .map(|key| key.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render the game-over statistics block.
    pub fn write_to(&self, console: &mut Console) {
        let score = format_points(self.score);
        console.success("════════ GAME OVER ════════");
        console.treasure(format!("🏆 FINAL SCORE: {score} POINTS"));
        console.blank();
        console.success("=== DETAILED STATISTICS ===");
        console.plain(format!("🕒 Total Game Time: {}", format_clock(self.game_time)));
        console.plain(format!(
            "💖 Final Health: {}/{}",
            self.health, self.max_health
        ));
        console.plain(format!(
            "🗝 Keys Collected: {} ({}/{REQUIRED_KEY_COUNT})",
            self.keys_label(),
            self.keys.len()
        ));
        let visited: Vec<&str> = self.visited.iter().map(|id| id.name()).collect();
        console.plain(format!("📍 Locations Visited: {}", visited.join(", ")));
        console.plain(format!("📊 Completion Rate: {}", self.completion_label()));
        console.blank();
        console.success("=== SCORE BREAKDOWN ===");
        console.plain(format!(
            "🗝 Keys Collected: {} × {} = {} pts",
            self.keys.len(),
            format_points(self.points_per_key),
            format_points(self.key_points)
        ));
        console.plain(format!(
            "🤔 Questions Answered: {} × {} = {} pts",
            self.questions_answered,
            format_points(self.points_per_answer),
            format_points(self.question_points)
        ));
        if let Some(bonus) = self.vault_bonus {
            console.treasure(format!(
                "💰 Treasure Vault Bonus: {} pts",
                format_points(bonus)
            ));
        }
        console.treasure(format!("🏆 TOTAL SCORE: {score} POINTS"));
        console.blank();
        let (banner, tone) = self.rank.banner();
        console.push(tone, banner);
        console.blank();
        console.success("Thanks for playing Chronos: The Dawn!");
        console.success("Click \"Reset Game\" to play again!");
    }
}

/// Body posted to the stats collaborator once per terminal transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload {
    pub game_time: f64,
    pub constant_game_time: f64,
    pub won: bool,
}

impl StatsPayload {
    #[must_use]
    pub const fn new(state: &GameState, outcome: Outcome) -> Self {
        Self {
            game_time: state.game_time,
            constant_game_time: state.constant_game_time,
            won: outcome.is_win(),
        }
    }
}

/// The signed-in player, as stored by the login flow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdentity {
    pub user_id: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl PlayerIdentity {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}

/// Fire-and-forget sink for final outcomes; failures never reach the caller.
pub trait StatsReporter {
    fn report(&self, player: &PlayerIdentity, payload: &StatsPayload);
}

impl<R: StatsReporter + ?Sized> StatsReporter for &R {
    fn report(&self, player: &PlayerIdentity, payload: &StatsPayload) {
        (**self).report(player, payload);
    }
}

impl<R: StatsReporter + ?Sized> StatsReporter for Rc<R> {
    fn report(&self, player: &PlayerIdentity, payload: &StatsPayload) {
        (**self).report(player, payload);
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl StatsReporter for NullReporter {
    fn report(&self, _player: &PlayerIdentity, _payload: &StatsPayload) {}
}

/// Keeps every report in memory; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    reports: Rc<RefCell<Vec<(String, StatsPayload)>>>,
}

impl RecordingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reports(&self) -> Vec<(String, StatsPayload)> {
        self.reports.borrow().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.reports.borrow().len()
    }
}

impl StatsReporter for RecordingReporter {
    fn report(&self, player: &PlayerIdentity, payload: &StatsPayload) {
        self.reports
            .borrow_mut()
            .push((player.user_id.clone(), payload.clone()));
    }
}
