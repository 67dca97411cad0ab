//! Catalog of scripted playthroughs.
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use chronos_game::{
    CommandEffect, GameConfig, GameSession, LocationId, Notification, Outcome,
    PlayerIdentity, Rank, RecordingReporter, SessionDeps, TickOutcome, TickerExit, TokioClock,
    World, run_ticker,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::oneshot;

use super::playthrough::Playthrough;

const SPECIAL: [LocationId; 3] = [
    LocationId::BermudaTriangle,
    LocationId::Stonehenge,
    LocationId::CrookedForest,
];

pub type ScriptFn = fn(&mut Playthrough) -> Result<()>;

#[derive(Debug, Clone, Copy)]
pub enum ScenarioKind {
    /// Runs against a manual clock; no real time passes.
    Scripted(ScriptFn),
    /// Drives the async ticker on the tokio clock.
    Live,
}

#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    pub kind: ScenarioKind,
}

const CATALOG: [Scenario; 7] = [
    Scenario {
        key: "smoke",
        description: "Intro, help, bad input and a quiet second in the hub",
        kind: ScenarioKind::Scripted(smoke),
    },
    Scenario {
        key: "full-win",
        description: "Collect all three keys and open the treasure vault",
        kind: ScenarioKind::Scripted(full_win),
    },
    Scenario {
        key: "timeout",
        description: "Linger in a special location until its portal collapses",
        kind: ScenarioKind::Scripted(timeout),
    },
    Scenario {
        key: "wrong-answers",
        description: "Answer a riddle wrong eleven times; health goes negative",
        kind: ScenarioKind::Scripted(wrong_answers),
    },
    Scenario {
        key: "resume",
        description: "Reload mid-run after a long absence; at most the catch-up cap is credited",
        kind: ScenarioKind::Scripted(resume),
    },
    Scenario {
        key: "random-walk",
        description: "Seeded random commands and pauses, checking clock and timer invariants",
        kind: ScenarioKind::Scripted(random_walk),
    },
    Scenario {
        key: "live-timeout",
        description: "Async ticker on real time with a one-second location timer",
        kind: ScenarioKind::Live,
    },
];

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATALOG.iter().map(|s| (s.key, s.description))
}

pub fn get_scenario(name: &str) -> Option<Scenario> {
    CATALOG.iter().find(|s| s.key == name).copied()
}

fn smoke(run: &mut Playthrough) -> Result<()> {
    let session = run.session();
    ensure!(session.is_active(), "fresh session should be active");
    ensure!(
        session.state().location == LocationId::CentralHub,
        "fresh session should start in the hub"
    );
    ensure!(
        session.console().contains("WELCOME TO CHRONOS"),
        "intro banner missing"
    );

    run.send("help");
    ensure!(
        run.session().console().contains("🎮 COMMANDS:"),
        "help listing missing"
    );

    let before = run.session().state().clone();
    run.send("dance");
    run.send("west");
    let after = run.session().state();
    ensure!(after.location == before.location, "bad input moved the player");
    ensure!(after.score == before.score, "bad input changed the score");
    ensure!(
        run.session().console().contains("❌ You can't go west from here."),
        "invalid direction not reported"
    );

    run.wait(1.0);
    let played = run.session().state().constant_game_time;
    ensure!((played - 1.0).abs() < 1e-6, "expected 1s played, got {played}");
    Ok(())
}

fn full_win(run: &mut Playthrough) -> Result<()> {
    for id in SPECIAL {
        run.fetch_key(id)?;
        run.wait(0.5);
    }
    ensure!(
        run.session().state().has_all_keys(),
        "expected all keys"
    );
    let effect = run.send("treasure");
    ensure!(effect == CommandEffect::Won, "treasure did not win: {effect:?}");

    let scoring = &run.config().scoring;
    let expected = 3 * scoring.key_points + 3 * scoring.answer_points + scoring.vault_bonus;
    let summary = run.summary();
    ensure!(
        summary.score == expected,
        "score {} != {expected}",
        summary.score
    );
    ensure!(
        run.session().notification() == Some(Notification::Victory),
        "victory popup not raised"
    );
    let report = run.session().final_report();
    ensure!(report.rank == Rank::MasterOfTime, "rank was {:?}", report.rank);

    let reports = run.reporter().reports();
    ensure!(reports.len() == 1, "expected one report, saw {}", reports.len());
    ensure!(reports[0].1.won, "report should record a win");
    ensure!(
        run.send("help") == CommandEffect::Ignored,
        "finished game still accepts commands"
    );
    Ok(())
}

fn timeout(run: &mut Playthrough) -> Result<()> {
    run.fetch_key(LocationId::BermudaTriangle)?;
    run.travel_to(LocationId::Stonehenge)?;
    let limit = run.config().location_time_limit_secs;
    let outcome = run.wait(limit + 5.0);
    ensure!(
        matches!(outcome, TickOutcome::TimedOut(_)),
        "expected a timeout, got {outcome:?}"
    );
    let session = run.session();
    ensure!(!session.is_active(), "session still active after timeout");
    ensure!(
        session.state().location_timer >= 0.0,
        "timer went negative"
    );
    ensure!(
        session.outcome() == Some(Outcome::TimedOut),
        "outcome not recorded"
    );
    let completion = session.final_report().completion_label();
    ensure!(completion == "33.3%", "completion was {completion}");
    ensure!(
        session.console().contains("📊 Completion Rate: 33.3%"),
        "statistics block missing"
    );
    let reports = run.reporter().reports();
    ensure!(
        reports.len() == 1 && !reports[0].1.won,
        "expected one loss report, saw {reports:?}"
    );
    Ok(())
}

fn wrong_answers(run: &mut Playthrough) -> Result<()> {
    let portal = run
        .session()
        .world()
        .portal_to(LocationId::CrookedForest)
        .context("no portal to the forest")?;
    run.send(portal.as_str());
    ensure!(
        run.session().state().awaiting_answer,
        "forest riddle not asked"
    );
    for _ in 0..11 {
        run.send("atlantis");
    }
    let scoring = &run.config().scoring;
    let expected = scoring.starting_health - 11 * scoring.wrong_answer_penalty;
    let state = run.session().state();
    ensure!(state.health == expected, "health {} != {expected}", state.health);
    ensure!(state.game_active, "negative health ended the game");
    ensure!(state.awaiting_answer, "riddle gate closed after wrong answers");
    ensure!(
        state.location == LocationId::CentralHub,
        "wrong answers let the player through"
    );
    Ok(())
}

fn resume(run: &mut Playthrough) -> Result<()> {
    run.fetch_key(LocationId::Stonehenge)?;
    run.travel_to(LocationId::BermudaTriangle)?;
    run.wait(2.0);
    let before = run.session().state().clone();

    run.sleep(3_600.0);
    run.reload(World::unseeded());
    let after = run.session().state();
    let seed = run.session().world().seed();
    ensure!(
        before.world_seed == Some(seed),
        "reload did not rebuild the saved world"
    );
    ensure!(after.location == before.location, "location lost on reload");
    ensure!(after.keys == before.keys, "keys lost on reload");
    ensure!(after.score == before.score, "score lost on reload");
    let credited = after.constant_game_time - before.constant_game_time;
    let cap = run.config().max_catch_up_secs;
    ensure!(
        (credited - cap).abs() < 1e-6,
        "credited {credited}s for an hour away, cap is {cap}s"
    );
    ensure!(
        after.location_timer <= before.location_timer,
        "timer went up across a reload"
    );

    run.return_to_hub()?;
    run.travel_to(LocationId::Stonehenge)?;
    ensure!(
        run.summary().score == before.score,
        "answered riddle scored twice after reload"
    );
    Ok(())
}

fn random_walk(run: &mut Playthrough) -> Result<()> {
    const WORDS: [&str; 10] = [
        "north", "south", "east", "west", "treasure", "collect", "help", "30", "france", "ship",
    ];
    let seed = run.session().world().seed();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut last_constant = run.session().state().constant_game_time;
    let mut last_keys = 0;

    for step in 0..400 {
        if rng.gen_bool(0.7) {
            let word = WORDS[rng.gen_range(0..WORDS.len())];
            run.send(word);
        } else {
            run.wait(rng.gen_range(0.1..3.0));
        }
        let state = run.session().state();
        ensure!(
            state.constant_game_time >= last_constant,
            "step {step}: constant time went backwards"
        );
        ensure!(state.location_timer >= 0.0, "step {step}: negative timer");
        ensure!(state.keys.len() >= last_keys, "step {step}: lost a key");
        ensure!(
            state.keys.len() <= 3,
            "step {step}: more keys than exist"
        );
        if state.location == LocationId::TreasureVault {
            ensure!(state.has_all_keys(), "step {step}: vault entered without all keys");
        }
        last_constant = state.constant_game_time;
        last_keys = state.keys.len();
        if !run.session().is_active() {
            break;
        }
    }
    Ok(())
}

/// Drive the tokio ticker until a one-second location timer expires.
pub async fn live_timeout(seed: u64, config: &GameConfig) -> Result<()> {
    let config = GameConfig {
        location_time_limit_secs: 1.0,
        ..config.clone()
    };
    let reporter = RecordingReporter::new();
    let clock = TokioClock::starting_at(chrono::Utc::now().timestamp_millis());
    let deps = SessionDeps::new(chronos_game::MemoryStorage::new(), clock, reporter.clone())
        .with_config(config);
    let mut session = GameSession::start(World::build(seed), deps)
        .with_player(Some(PlayerIdentity::new("chronos-tester")));

    let portal = session
        .world()
        .portal_to(LocationId::Stonehenge)
        .context("no portal to Stonehenge")?;
    let answer = session
        .world()
        .location(LocationId::Stonehenge)
        .riddle
        .as_ref()
        .map(|riddle| riddle.answer)
        .context("Stonehenge has no riddle")?;
    session.submit(portal.as_str());
    session.submit(answer);
    ensure!(
        session.state().location == LocationId::Stonehenge,
        "could not enter Stonehenge"
    );

    let session = Rc::new(RefCell::new(session));
    let (_shutdown, rx) = oneshot::channel();
    let exit = tokio::time::timeout(Duration::from_secs(5), run_ticker(Rc::clone(&session), rx))
        .await
        .context("ticker did not stop within 5s")?;
    if exit != TickerExit::SessionEnded {
        bail!("ticker exited with {exit:?}");
    }
    let session = session.borrow();
    ensure!(
        session.notification() == Some(Notification::TimeUp),
        "time-up popup not raised"
    );
    ensure!(reporter.count() == 1, "expected one report, saw {}", reporter.count());
    Ok(())
}
