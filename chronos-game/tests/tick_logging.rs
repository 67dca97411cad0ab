use std::sync::Mutex;

use chronos_game::tick::advance;
use chronos_game::{GameConfig, GameState, LocationId, TickOutcome, World};
use log::{Level, LevelFilter, Log, Metadata, Record};

struct Capture {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.target() == "chronos_game::tick" {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    records: Mutex::new(Vec::new()),
};

#[test]
fn timed_ticks_log_the_countdown_and_the_hub_stays_quiet() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Debug);

    let cfg = GameConfig::default();
    let world = World::build(11);
    let mut state = GameState::fresh(&cfg, 0);
    for step in 1..=5 {
        advance(&mut state, &world, step * 100, &cfg);
    }
    assert!(CAPTURE.records.lock().unwrap().is_empty());

    state.location = LocationId::BermudaTriangle;
    state.location_timer = 0.3;
    advance(&mut state, &world, 600, &cfg);
    let outcome = advance(&mut state, &world, 1_000, &cfg);
    assert!(matches!(outcome, TickOutcome::TimedOut(_)));

    let records = CAPTURE.records.lock().unwrap();
    let debug: Vec<_> = records
        .iter()
        .filter(|(level, _)| *level == Level::Debug)
        .collect();
    assert_eq!(debug.len(), 2, "{records:?}");
    assert!(debug[0].1.starts_with("Bermuda Triangle timer at 0.2s"), "{records:?}");
    assert!(
        records
            .iter()
            .any(|(level, line)| *level == Level::Info && line.contains("location timer expired")),
        "{records:?}"
    );
}
