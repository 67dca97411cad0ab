use chronos_game::save::{self, LoadSource};
use chronos_game::tick::{advance, elapsed_secs};
use chronos_game::{
    Console, Direction, GameConfig, GameState, KeyKind, LocationId, MemoryStorage, TickOutcome,
    TimeEffect, Turn, World, decode_share_code, encode_share_code,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn location_with(world: &World, effect: TimeEffect) -> LocationId {
    LocationId::SPECIAL
        .into_iter()
        .find(|id| world.location(*id).time_effect == effect)
        .unwrap()
}

/// Jittery wall-clock schedule: mostly ~100 ms, with stalls and clock steps backwards.
fn jittery_schedule(seed: u64, steps: usize) -> Vec<i64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut now = 0_i64;
    (0..steps)
        .map(|_| {
            now += match rng.gen_range(0..20) {
                0 => rng.gen_range(10_000..60_000),
                1 => -rng.gen_range(0..500),
                _ => rng.gen_range(80..130),
            };
            now
        })
        .collect()
}

#[test]
fn constant_time_is_the_sum_of_clamped_deltas() {
    let cfg = GameConfig::default();
    for seed in 0..16 {
        let world = World::build(seed);
        let mut state = GameState::fresh(&cfg, 0);
        state.location = location_with(&world, TimeEffect::Decelerated);
        state.location_timer = 1e9;

        let mut expected = 0.0;
        let mut previous_constant = 0.0;
        let mut last = state.last_tick_time;
        for now in jittery_schedule(seed, 400) {
            expected += elapsed_secs(last, now, cfg.max_catch_up_secs);
            advance(&mut state, &world, now, &cfg);
            last = Some(now);
            assert!(state.constant_game_time >= previous_constant);
            previous_constant = state.constant_game_time;
        }
        assert!((state.constant_game_time - expected).abs() < 1e-6);
    }
}

#[test]
fn reverse_location_runs_time_backwards_on_every_positive_tick() {
    let cfg = GameConfig::default();
    let world = World::build(31);
    let mut state = GameState::fresh(&cfg, 0);
    state.location = location_with(&world, TimeEffect::Reverse);
    state.location_timer = 1e9;
    for now in jittery_schedule(99, 300) {
        let before = state.game_time;
        let positive = elapsed_secs(state.last_tick_time, now, cfg.max_catch_up_secs) > 0.0;
        advance(&mut state, &world, now, &cfg);
        if positive {
            assert!(state.game_time < before);
        } else {
            assert!((state.game_time - before).abs() < f64::EPSILON);
        }
    }
}

#[test]
fn location_timer_never_goes_negative_and_expiry_ends_the_session() {
    let cfg = GameConfig::default();
    for seed in 0..8 {
        let world = World::build(seed);
        let mut state = GameState::fresh(&cfg, 0);
        state.location = location_with(&world, TimeEffect::Accelerated);
        state.location_timer = 3.0;
        let mut ended = false;
        for now in jittery_schedule(seed + 100, 200) {
            let outcome = advance(&mut state, &world, now, &cfg);
            assert!(state.location_timer >= 0.0);
            if state.location_timer <= 0.0 && !ended {
                assert!(matches!(outcome, TickOutcome::TimedOut(_)));
                assert!(!state.game_active);
                ended = true;
            }
        }
        assert!(ended);
    }
}

#[test]
fn accelerated_scenario_matches_expected_clocks() {
    let cfg = GameConfig::default();
    let world = World::build(2024);
    let mut state = GameState::fresh(&cfg, 0);
    state.location = location_with(&world, TimeEffect::Accelerated);
    state.location_timer = cfg.location_time_limit_secs;
    for step in 1..=100 {
        advance(&mut state, &world, step * 100, &cfg);
    }
    assert!((state.game_time - 15.0).abs() < 1e-6);
    assert!((state.constant_game_time - 10.0).abs() < 1e-6);
    assert!((state.location_timer - 110.0).abs() < 1e-6);
}

#[test]
fn treasure_gate_is_set_membership() {
    let cfg = GameConfig::default();
    let keys = KeyKind::ALL;
    for mask in 0_u8..8 {
        let mut world = World::build(u64::from(mask));
        let mut state = GameState::fresh(&cfg, 0);
        for (bit, key) in keys.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                state.add_key(*key);
            }
        }
        // Duplicates never inflate the key count.
        if mask & 1 != 0 {
            assert!(!state.add_key(keys[0]));
        }
        let mut console = Console::new();
        Turn::new(&mut state, &mut world, &mut console, &cfg).execute("treasure");
        assert_eq!(state.location == LocationId::TreasureVault, mask == 0b111);
    }
}

#[test]
fn answers_score_once_per_location_across_reloads() {
    let cfg = GameConfig::default();
    let storage = MemoryStorage::new();
    let mut world = World::build(13);
    let mut state = GameState::fresh(&cfg, 0).with_world_seed(13);
    let mut console = Console::new();
    let portal = world.portal_to(LocationId::Stonehenge).unwrap();

    Turn::new(&mut state, &mut world, &mut console, &cfg).execute(portal.as_str());
    Turn::new(&mut state, &mut world, &mut console, &cfg).execute("30");
    assert_eq!(state.score, 500);
    save::save(&storage, &cfg, &state).unwrap();

    let mut reloaded_world = World::build(13);
    let (mut reloaded, source) = save::load(&storage, &mut reloaded_world, &cfg, 0);
    assert_eq!(source, LoadSource::Resumed);
    let back = portal.reverse().unwrap();
    Turn::new(&mut reloaded, &mut reloaded_world, &mut console, &cfg).execute(back.as_str());
    Turn::new(&mut reloaded, &mut reloaded_world, &mut console, &cfg).execute(portal.as_str());
    assert_eq!(reloaded.location, LocationId::Stonehenge);
    assert!(!reloaded.awaiting_answer);
    assert_eq!(reloaded.score, 500);
}

#[test]
fn save_and_load_with_zero_elapsed_is_lossless() {
    let cfg = GameConfig::default();
    let storage = MemoryStorage::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);
    for round in 0..500_u64 {
        let mut world = World::build(5);
        let now = 42_000 + i64::try_from(round).unwrap();
        let mut state = GameState::fresh(&cfg, now).with_world_seed(5);
        state.location = location_with(&world, TimeEffect::Reverse);
        state.location_timer = rng.gen_range(0.0..cfg.location_time_limit_secs);
        state.game_time = rng.gen_range(-1_000.0..1_000.0);
        state.constant_game_time = rng.gen_range(0.0..10_000.0);
        state.health = rng.gen_range(-50..=100);
        state.score = rng.gen_range(0..20) * 500;
        state.add_key(KeyKind::Forest);
        state.add_key(KeyKind::Triangle);
        state.mark_visited(state.location);
        state.record_answer(LocationId::CrookedForest);
        state.ask(
            LocationId::Stonehenge,
            "How many stones form the main circle of Stonehenge?",
        );
        save::save(&storage, &cfg, &state).unwrap();

        let (loaded, _) = save::load(&storage, &mut world, &cfg, now);
        assert_eq!(loaded, state, "round {round}");
    }
}

#[test]
fn clocks_accumulated_from_ticks_survive_a_reload() {
    let cfg = GameConfig::default();
    let storage = MemoryStorage::new();
    let world = World::build(21);
    let mut state = GameState::fresh(&cfg, 0).with_world_seed(21);
    state.location = location_with(&world, TimeEffect::Decelerated);
    state.location_timer = cfg.location_time_limit_secs;
    let mut last = 0;
    for now in jittery_schedule(21, 700).into_iter().filter(|now| *now > 0) {
        advance(&mut state, &world, now, &cfg);
        last = now;
        if !state.game_active {
            break;
        }
    }
    save::save(&storage, &cfg, &state).unwrap();

    let mut reloaded_world = World::build(21);
    let (loaded, _) = save::load(&storage, &mut reloaded_world, &cfg, last);
    assert_eq!(loaded.game_time.to_bits(), state.game_time.to_bits());
    assert_eq!(loaded.constant_game_time.to_bits(), state.constant_game_time.to_bits());
    assert_eq!(loaded.location_timer.to_bits(), state.location_timer.to_bits());
}

#[test]
fn load_credits_at_most_ten_seconds() {
    let cfg = GameConfig::default();
    let storage = MemoryStorage::new();
    let mut world = World::build(6);
    let mut state = GameState::fresh(&cfg, 0).with_world_seed(6);
    state.location = location_with(&world, TimeEffect::Accelerated);
    state.location_timer = 5.0;
    save::save(&storage, &cfg, &state).unwrap();

    let (loaded, _) = save::load(&storage, &mut world, &cfg, 3_600_000);
    assert!((loaded.constant_game_time - 10.0).abs() < 1e-9);
    assert!((loaded.game_time - 15.0).abs() < 1e-9);
    assert!(loaded.location_timer.abs() < f64::EPSILON);
    assert_eq!(loaded.last_tick_time, Some(3_600_000));
}

#[test]
fn hub_exits_reverse_back_from_every_special_location() {
    for seed in [0, 1, 99, 12_345] {
        let world = World::build(seed);
        for portal in Direction::PORTALS {
            let destination = world.location(LocationId::CentralHub).exit(portal).unwrap();
            let back = portal.reverse().unwrap();
            assert_eq!(
                world.location(destination).exit(back),
                Some(LocationId::CentralHub)
            );
        }
    }
}

#[test]
fn share_codes_pin_the_world_topology() {
    let seed = decode_share_code("CH-VORTEX13").unwrap();
    assert_eq!(encode_share_code(seed), "CH-VORTEX13");
    assert_eq!(World::build(seed), World::build(seed));
}
