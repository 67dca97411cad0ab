//! Headless session wired to a manual clock, in-memory storage and a recording reporter.
use std::rc::Rc;

use anyhow::{Context, Result, ensure};
use chronos_game::{
    CommandEffect, GameConfig, GameSession, LocationId, ManualClock, MemoryStorage, Outcome,
    PlayerIdentity, RecordingReporter, SessionDeps, TickOutcome, World,
};
use serde::Serialize;

pub type HeadlessSession = GameSession<MemoryStorage, Rc<ManualClock>, RecordingReporter>;

/// Epoch the manual clock starts at; any fixed instant works.
const START_MS: i64 = 1_700_000_000_000;
const TESTER_USER_ID: &str = "chronos-tester";

pub struct Playthrough {
    session: HeadlessSession,
    clock: Rc<ManualClock>,
    storage: MemoryStorage,
    reporter: RecordingReporter,
    config: GameConfig,
    verbose: bool,
}

impl Playthrough {
    pub fn new(seed: u64, config: &GameConfig, verbose: bool) -> Self {
        let clock = Rc::new(ManualClock::new(START_MS));
        let storage = MemoryStorage::new();
        let reporter = RecordingReporter::new();
        let session = Self::open(
            World::build(seed),
            &storage,
            &clock,
            &reporter,
            config,
        );
        Self {
            session,
            clock,
            storage,
            reporter,
            config: config.clone(),
            verbose,
        }
    }

    fn open(
        world: World,
        storage: &MemoryStorage,
        clock: &Rc<ManualClock>,
        reporter: &RecordingReporter,
        config: &GameConfig,
    ) -> HeadlessSession {
        let deps = SessionDeps::new(storage.clone(), Rc::clone(clock), reporter.clone())
            .with_config(config.clone());
        GameSession::start(world, deps).with_player(Some(PlayerIdentity::new(TESTER_USER_ID)))
    }

    /// Close the session and resume from the save slot, as a page reload would.
    ///
    /// `world` is the world the new page would have rolled; the saved seed wins.
    pub fn reload(&mut self, world: World) {
        self.session = Self::open(
            world,
            &self.storage,
            &self.clock,
            &self.reporter,
            &self.config,
        );
    }

    pub fn send(&mut self, line: &str) -> CommandEffect {
        let mark = self.session.console().len();
        let effect = self.session.submit(line);
        if self.verbose {
            log::debug!("> {line} ({effect:?})");
            for entry in self.session.console().since(mark) {
                log::debug!("  {}", entry.text);
            }
        }
        effect
    }

    /// Advance the clock in tick-sized steps until `secs` pass or the session stops.
    pub fn wait(&mut self, secs: f64) -> TickOutcome {
        let step_ms = i64::try_from(self.config.tick_interval_ms).unwrap_or(i64::MAX);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_precision_loss,
            clippy::cast_sign_loss
        )]
        let steps = (secs * 1000.0 / step_ms as f64).ceil().max(1.0) as u64;
        let mut last = TickOutcome::Inactive;
        for _ in 0..steps {
            self.clock.advance_ms(step_ms);
            last = self.session.tick();
            if !matches!(last, TickOutcome::Advanced(_)) {
                break;
            }
        }
        last
    }

    /// Let the clock jump without ticking, as while the tab is closed.
    pub fn sleep(&self, secs: f64) {
        self.clock.advance_secs(secs);
    }

    /// Walk from the hub into `id`, answering its riddle when asked.
    pub fn travel_to(&mut self, id: LocationId) -> Result<()> {
        let world = self.session.world();
        let portal = world
            .portal_to(id)
            .with_context(|| format!("no hub portal leads to {}", id.name()))?;
        let location = world.location(id);
        let pending = location.question_pending();
        let answer = location.riddle.as_ref().map(|riddle| riddle.answer);
        self.send(portal.as_str());
        if pending {
            let answer = answer.with_context(|| format!("{} has no riddle", id.name()))?;
            self.send(answer);
        }
        let here = self.session.state().location;
        ensure!(here == id, "expected to reach {}, still in {}", id.name(), here.name());
        Ok(())
    }

    pub fn return_to_hub(&mut self) -> Result<()> {
        let here = self.session.state().location;
        let back = self
            .session
            .world()
            .portal_to(here)
            .and_then(chronos_game::Direction::reverse)
            .with_context(|| format!("no way back from {}", here.name()))?;
        self.send(back.as_str());
        ensure!(
            self.session.state().location == LocationId::CentralHub,
            "'{back}' from {} did not return to the hub",
            here.name()
        );
        Ok(())
    }

    pub fn fetch_key(&mut self, id: LocationId) -> Result<()> {
        self.travel_to(id)?;
        self.send("collect");
        self.return_to_hub()
    }

    pub const fn session(&self) -> &HeadlessSession {
        &self.session
    }

    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    pub const fn reporter(&self) -> &RecordingReporter {
        &self.reporter
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_session(&self.session)
    }
}

/// Where a playthrough ended up; attached to scenario results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub location: String,
    pub score: u64,
    pub health: i32,
    pub keys: usize,
    pub game_time: f64,
    pub constant_game_time: f64,
    pub outcome: Option<Outcome>,
    pub rank: String,
    pub completion: String,
}

impl RunSummary {
    pub fn from_session(session: &HeadlessSession) -> Self {
        let state = session.state();
        let report = session.final_report();
        Self {
            location: state.location.name().to_string(),
            score: state.score,
            health: state.health,
            keys: state.keys.len(),
            game_time: state.game_time,
            constant_game_time: state.constant_game_time,
            outcome: session.outcome(),
            rank: report.rank.title().to_string(),
            completion: report.completion_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_answers_the_riddle_on_the_way_in() {
        let mut run = Playthrough::new(3, &GameConfig::default(), false);
        run.travel_to(LocationId::Stonehenge).unwrap();
        assert!(!run.session().state().awaiting_answer);
        assert_eq!(run.summary().score, 500);
        run.return_to_hub().unwrap();
    }

    #[test]
    fn reload_resumes_from_the_shared_slot() {
        let mut run = Playthrough::new(4, &GameConfig::default(), false);
        run.fetch_key(LocationId::CrookedForest).unwrap();
        let before = run.summary();
        run.reload(World::build(99));
        assert_eq!(run.session().world().seed(), 4);
        assert_eq!(run.summary().score, before.score);
        assert_eq!(run.summary().keys, 1);
    }
}
