//! Chronos Game Engine
//!
//! Platform-agnostic core of the Chronos: The Dawn time-travel text adventure.
//! This crate provides the world model, the real-time tick engine, the command
//! interpreter, save/resume and outcome reporting without UI or
//! platform-specific dependencies.

pub mod clock;
pub mod command;
pub mod config;
pub mod console;
pub mod constants;
#[cfg(feature = "async")]
pub mod driver;
pub mod format;
pub mod outcome;
pub mod save;
pub mod session;
pub mod share;
pub mod state;
pub mod tick;
pub mod world;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{Command, CommandEffect, Turn};
pub use config::{ConfigError, GameConfig, ScoringCfg};
pub use console::{Console, LogLine, Tone};
#[cfg(feature = "async")]
pub use driver::{TickerExit, TokioClock, run_ticker};
pub use format::{format_clock, format_points};
pub use outcome::{
    FinalReport, Notification, NullReporter, Outcome, PlayerIdentity, Rank, RecordingReporter,
    StatsPayload, StatsReporter,
};
pub use save::{LoadSource, MemoryStorage, StorageError};
pub use session::{GameSession, SessionDeps};
pub use share::{decode_share_code, encode_share_code, share_code_from_entropy};
pub use state::{GameState, KeyRing};
pub use tick::{TickDelta, TickOutcome};
pub use world::{Direction, KeyKind, Location, LocationId, Riddle, TimeEffect, World};

/// Trait for abstracting the persisted save slot.
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the raw payload stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load_raw(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Overwrite the payload stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be written.
    fn save_raw(&self, key: &str, payload: &str) -> Result<(), Self::Error>;

    /// Delete the payload stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, key: &str) -> Result<(), Self::Error>;
}

impl<T: GameStorage + ?Sized> GameStorage for &T {
    type Error = T::Error;

    fn load_raw(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).load_raw(key)
    }

    fn save_raw(&self, key: &str, payload: &str) -> Result<(), Self::Error> {
        (**self).save_raw(key, payload)
    }

    fn delete_save(&self, key: &str) -> Result<(), Self::Error> {
        (**self).delete_save(key)
    }
}
