//! Session context: one object owning the world, the state, the console and
//! the injected platform services.
//!
//! Every mutation goes through [`GameSession`] and is followed by a write to
//! the save slot. Terminal transitions are reported to the stats collaborator
//! exactly once.
use crate::GameStorage;
use crate::clock::Clock;
use crate::command::{CommandEffect, Turn};
use crate::config::GameConfig;
use crate::console::Console;
use crate::constants::REQUIRED_KEY_COUNT;
use crate::outcome::{
    FinalReport, Notification, Outcome, PlayerIdentity, StatsPayload, StatsReporter,
};
use crate::save::{self, LoadSource};
use crate::state::GameState;
use crate::tick::{self, TickOutcome};
use crate::world::World;

/// Platform services a session is built from.
pub struct SessionDeps<S, C, R> {
    pub storage: S,
    pub clock: C,
    pub reporter: R,
    pub config: GameConfig,
}

impl<S, C, R> SessionDeps<S, C, R> {
    pub fn new(storage: S, clock: C, reporter: R) -> Self {
        Self {
            storage,
            clock,
            reporter,
            config: GameConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }
}

pub struct GameSession<S, C, R>
where
    S: GameStorage,
    C: Clock,
    R: StatsReporter,
{
    world: World,
    state: GameState,
    console: Console,
    config: GameConfig,
    storage: S,
    clock: C,
    reporter: R,
    player: Option<PlayerIdentity>,
    notification: Option<Notification>,
    outcome: Option<Outcome>,
    load_source: LoadSource,
}

impl<S, C, R> GameSession<S, C, R>
where
    S: GameStorage,
    C: Clock,
    R: StatsReporter,
{
    /// Resume from the save slot or start fresh in `world`.
    ///
    /// A snapshot played in a different world replaces `world` with that one.
    pub fn start(mut world: World, deps: SessionDeps<S, C, R>) -> Self {
        let SessionDeps {
            storage,
            clock,
            reporter,
            config,
        } = deps;
        let (state, load_source) = save::load(&storage, &mut world, &config, clock.now_ms());
        let mut session = Self {
            world,
            state,
            console: Console::new(),
            config,
            storage,
            clock,
            reporter,
            player: None,
            notification: None,
            outcome: None,
            load_source,
        };
        session.open();
        session
    }

    #[must_use]
    pub fn with_player(mut self, player: Option<PlayerIdentity>) -> Self {
        self.player = player;
        self
    }

    pub fn set_player(&mut self, player: Option<PlayerIdentity>) {
        self.player = player;
    }

    fn open(&mut self) {
        write_intro(&mut self.console);
        match self.load_source {
            LoadSource::Resumed if !self.state.game_active => {
                self.console
                    .warning("⌛ This adventure has already ended. Reset the game to play again.");
                self.turn().describe();
            }
            LoadSource::Resumed => {
                self.turn().describe();
                if let Some(prompt) = self.state.current_question.clone() {
                    self.console.question(format!("🤔 {prompt}"));
                    self.console.plain("💭 Type '<your_response>' to respond.");
                }
            }
            LoadSource::Fresh | LoadSource::Recovered => {
                let here = self.state.location;
                self.turn().enter(here);
            }
        }
        self.persist();
    }

    fn turn(&mut self) -> Turn<'_> {
        Turn::new(
            &mut self.state,
            &mut self.world,
            &mut self.console,
            &self.config,
        )
    }

    /// Apply one tick at the injected clock's current time.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now_ms();
        let outcome = tick::advance(&mut self.state, &self.world, now, &self.config);
        match outcome {
            TickOutcome::Inactive => return outcome,
            TickOutcome::TimedOut(_) => {
                self.final_report().write_to(&mut self.console);
                self.finish(Outcome::TimedOut);
            }
            TickOutcome::Advanced(_) => {}
        }
        self.persist();
        outcome
    }

    /// Interpret one line of player input.
    pub fn submit(&mut self, line: &str) -> CommandEffect {
        let effect = self.turn().execute(line);
        match effect {
            CommandEffect::Ignored => return effect,
            CommandEffect::Won => self.finish(Outcome::Won),
            CommandEffect::Handled => {}
        }
        self.persist();
        effect
    }

    /// Wipe the slot and start over in `world`.
    pub fn reset(&mut self, world: World) {
        if let Err(err) = save::clear(&self.storage, &self.config) {
            log::warn!("failed to clear save slot: {err}");
        }
        self.state =
            GameState::fresh(&self.config, self.clock.now_ms()).with_world_seed(world.seed());
        self.world = world;
        self.console.clear();
        self.notification = None;
        self.outcome = None;
        self.load_source = LoadSource::Fresh;
        log::info!("session reset into world {}", self.world.seed());
        self.open();
    }

    fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        self.notification = Some(outcome.notification());
        log::info!(
            "session ended: {outcome:?} score={} keys={}/{REQUIRED_KEY_COUNT}",
            self.state.score,
            self.state.keys.len()
        );
        match &self.player {
            Some(player) => {
                let payload = StatsPayload::new(&self.state, outcome);
                self.reporter.report(player, &payload);
            }
            None => log::debug!("no signed-in player; outcome not reported"),
        }
    }

    fn persist(&self) {
        if let Err(err) = save::save(&self.storage, &self.config, &self.state) {
            log::warn!("failed to persist game state: {err}");
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    #[must_use]
    pub const fn console(&self) -> &Console {
        &self.console
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn player(&self) -> Option<&PlayerIdentity> {
        self.player.as_ref()
    }

    #[must_use]
    pub const fn load_source(&self) -> LoadSource {
        self.load_source
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.game_active
    }

    /// Pending popup, if a terminal transition happened this session.
    #[must_use]
    pub const fn notification(&self) -> Option<Notification> {
        self.notification
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[must_use]
    pub fn final_report(&self) -> FinalReport {
        FinalReport::from_state(&self.state, &self.world, &self.config)
    }

    /// Milliseconds until the next tick should fire.
    #[must_use]
    pub const fn tick_interval_ms(&self) -> u64 {
        self.config.tick_interval_ms
    }
}

fn write_intro(console: &mut Console) {
    let rule = format!("🌟 {}", "═".repeat(60));
    console.success(rule.clone());
    console.success("🌟 WELCOME TO CHRONOS: THE DAWN! 🌟");
    console.success(rule);
    console.blank();
    console.treasure("🎯 YOUR MISSION: Collect all 3 keys from different time-distorted locations!");
    console.warning("⏰ WARNING: Each location has unique time effects that will challenge you!");
    console.blank();
    console.success("💡 TIPS:");
    console.plain("• Use \"help\" to see all available commands");
    console.plain("• Watch your location timer - you have 2 minutes per special location!");
    console.plain("• ACCELERATED: Game time moves 1.5x faster (3min in 2min)");
    console.plain("• DECELERATED: Game time moves 0.5x slower (1min in 2min)");
    console.plain("• REVERSE: Game time flows backward!");
    console.plain("• Answer questions correctly to progress");
    console.plain("• Collect keys to unlock the treasure vault");
    console.blank();
    console.success("🚀 Type your first command to begin your adventure!");
    console.blank();
}
