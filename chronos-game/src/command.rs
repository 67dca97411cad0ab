//! Command interpreter: one line of player input against the current state.
use crate::config::GameConfig;
use crate::console::Console;
use crate::format::format_points;
use crate::state::GameState;
use crate::world::{Direction, LocationId, World};

/// A parsed normal-mode command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Go(Direction),
    Collect,
    Unknown(String),
}

impl Command {
    /// Parse the first whitespace token, case-insensitively.
    ///
    /// Returns `None` for blank input.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let word = line.split_whitespace().next()?.to_lowercase();
        Some(match word.as_str() {
            "help" => Self::Help,
            "collect" => Self::Collect,
            other => Direction::parse(other).map_or_else(|| Self::Unknown(word.clone()), Self::Go),
        })
    }
}

/// What a submitted line did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEffect {
    /// Blank input or input after the session ended.
    Ignored,
    Handled,
    /// The player entered the vault.
    Won,
}

/// Everything a command may touch.
pub struct Turn<'a> {
    pub state: &'a mut GameState,
    pub world: &'a mut World,
    pub console: &'a mut Console,
    pub config: &'a GameConfig,
}

impl<'a> Turn<'a> {
    pub fn new(
        state: &'a mut GameState,
        world: &'a mut World,
        console: &'a mut Console,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            state,
            world,
            console,
            config,
        }
    }

    /// Interpret one line of input.
    pub fn execute(&mut self, line: &str) -> CommandEffect {
        if !self.state.game_active {
            return CommandEffect::Ignored;
        }
        let line = line.trim();
        if line.is_empty() {
            return CommandEffect::Ignored;
        }
        self.console.plain(format!("> {line}"));

        if self.state.awaiting_answer {
            return self.answer(line);
        }
        match Command::parse(line) {
            Some(Command::Help) => {
                self.help();
                CommandEffect::Handled
            }
            Some(Command::Go(direction)) => self.go(direction),
            Some(Command::Collect) => {
                self.collect();
                CommandEffect::Handled
            }
            Some(Command::Unknown(word)) => {
                self.console.error(format!(
                    "❓ Unknown command: \"{word}\". Type 'help' for available commands."
                ));
                CommandEffect::Handled
            }
            None => CommandEffect::Ignored,
        }
    }

    fn help(&mut self) {
        self.console.plain("🎮 COMMANDS:");
        self.console
            .plain("• north/south/east/west - Move between locations");
        self.console
            .plain("• treasure - Go to treasure vault (requires ALL 3 keys!)");
        self.console.plain("• collect - Pick up keys");
        self.console.plain("• help - Show this help");
        self.console.blank();
        self.console
            .plain("💡 TIP: Collect all 3 keys to unlock the treasure vault!");
        self.console.blank();
    }

    fn answer(&mut self, response: &str) -> CommandEffect {
        let target = self.state.question_location.unwrap_or(self.state.location);
        let Some(riddle) = self.world.location(target).riddle.clone() else {
            log::warn!("question gate open for {target} without a riddle; clearing it");
            self.state.clear_question();
            return CommandEffect::Handled;
        };

        if !riddle.accepts(response) {
            self.state.health -= self.config.scoring.wrong_answer_penalty;
            self.console.error("❌ Incorrect answer. Try again!");
            self.console.question(format!("🤔 {}", riddle.prompt));
            return CommandEffect::Handled;
        }

        self.console.success("✅ Correct! Well done!");
        if self.world.mark_answered(target) {
            self.state.score += self.config.scoring.answer_points;
            self.state.record_answer(target);
        }
        self.state.clear_question();

        if target == self.state.location {
            return CommandEffect::Handled;
        }
        let route = self
            .world
            .location(self.state.location)
            .exits
            .iter()
            .find_map(|(direction, dest)| (*dest == target).then_some(*direction));
        match route {
            Some(direction) => {
                self.console.plain(format!("🚶 Moving {direction}..."));
                self.enter(target)
            }
            None => CommandEffect::Handled,
        }
    }

    fn go(&mut self, direction: Direction) -> CommandEffect {
        let Some(destination) = self.world.location(self.state.location).exit(direction) else {
            self.console
                .error(format!("❌ You can't go {direction} from here."));
            return CommandEffect::Handled;
        };

        if direction == Direction::Treasure && !self.state.has_all_keys() {
            let needed = self.state.keys_needed();
            self.console.error(format!(
                "🔐 The treasure vault is sealed! You need {needed} more keys."
            ));
            self.console.warning(format!(
                "🗝 Current keys: {} ({}/{})",
                self.state.keys_label(),
                self.state.keys.len(),
                crate::constants::REQUIRED_KEY_COUNT
            ));
            self.console.warning(
                "💡 Visit Bermuda Triangle, Stonehenge, and Crooked Forest to collect all keys!",
            );
            return CommandEffect::Handled;
        }

        if let Some(riddle) = self.world.location(destination).riddle.as_ref()
            && !riddle.answered
        {
            let prompt = riddle.prompt;
            self.console.question(format!("🤔 {prompt}"));
            self.console.plain("💭 Type '<your_response>' to respond.");
            self.state.ask(destination, prompt);
            return CommandEffect::Handled;
        }

        self.console.plain(format!("🚶 Moving {direction}..."));
        self.enter(destination)
    }

    fn collect(&mut self) {
        let key = self.world.location(self.state.location).key;
        let Some(key) = key.filter(|key| !self.state.has_key(*key)) else {
            self.console
                .error("❌ There's no key to collect here or you already have it.");
            return;
        };
        self.state.add_key(key);
        self.state.score += self.config.scoring.key_points;
        self.console.success(format!("✨ You collected the {key}!"));
        if self.state.has_all_keys() {
            self.console.treasure("🎉 ALL KEYS COLLECTED! 🎉");
            self.console
                .treasure("💰 The treasure vault is now accessible from Central Hub!");
        } else {
            let remaining = self.state.keys_needed();
            let plural = if remaining > 1 { "s" } else { "" };
            self.console.success(format!(
                "🗝 {remaining} more key{plural} needed for the treasure vault!"
            ));
        }
    }

    /// Move into `id` and run its arrival effects.
    pub fn enter(&mut self, id: LocationId) -> CommandEffect {
        self.state.location = id;
        if id.is_timed() {
            self.state.location_timer = self.config.location_time_limit_secs;
        }
        self.describe();
        self.state.mark_visited(id);

        if id == LocationId::TreasureVault {
            self.state.score += self.config.scoring.vault_bonus;
            self.state.game_active = false;
            log::info!(
                "vault reached with {} points",
                format_points(self.state.score)
            );
            return CommandEffect::Won;
        }
        CommandEffect::Handled
    }

    /// Log the current location's welcome, exits and key prompt without side effects.
    pub fn describe(&mut self) {
        let location = self.world.location(self.state.location);
        self.console.success(location.welcome);
        self.console.plain(location.description);
        self.console.blank();

        if !location.exits.is_empty() {
            let exits: Vec<&str> = location.exits.keys().map(|dir| dir.as_str()).collect();
            self.console
                .plain(format!("🚪 Available directions: {}", exits.join(", ")));
            if location.exits.contains_key(&Direction::Treasure) {
                if self.state.has_all_keys() {
                    self.console
                        .treasure("💰 ✨ TREASURE VAULT UNLOCKED! Type \"treasure\" to enter! ✨");
                } else {
                    self.console.warning(format!(
                        "🔐 Treasure Vault: LOCKED (Need {} more keys)",
                        self.state.keys_needed()
                    ));
                }
            }
        }

        if let Some(key) = location.key
            && !self.state.has_key(key)
        {
            self.console
                .plain(format!("🗝 You see a {key} glinting nearby! Type 'collect' to take it."));
        }
    }
}
