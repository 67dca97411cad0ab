use std::rc::Rc;

use chronos_game::{
    Console, FinalReport, GameConfig, GameState, KeyKind, LocationId, Notification, World,
};
use futures::executor::block_on;
use yew::{Callback, LocalServerRenderer};

use super::command_input::{CommandInput, CommandInputProps};
use super::confirm_dialog::{ConfirmDialog, ConfirmDialogProps};
use super::console_view::{ConsoleView, ConsoleViewProps};
use super::last_game::{LastGame, LastGameProps};
use crate::api::parse_stats;
use super::outcome_popup::{OutcomePopup, OutcomePopupProps};
use super::status_panel::{StatusPanel, StatusPanelProps, StatusView, health_class, timer_class};

fn state_in(location: LocationId) -> (GameState, World) {
    let world = World::build(7);
    let mut state = GameState::fresh(&GameConfig::default(), 0).with_world_seed(7);
    state.location = location;
    (state, world)
}

#[test]
fn status_panel_hides_the_timer_in_the_hub() {
    let (state, world) = state_in(LocationId::CentralHub);
    let view = StatusView::new(&state, &world);
    assert_eq!(view.location_timer, None);
    assert_eq!(view.keys.as_str(), "None");

    let html = block_on(LocalServerRenderer::<StatusPanel>::with_props(StatusPanelProps { view }).render());
    assert!(html.contains("Central Hub"), "hub missing: {html}");
    assert!(html.contains("--:--:--"), "timer placeholder missing: {html}");
    assert!(html.contains("100/100"), "health missing: {html}");
    assert!(html.contains("CH-"), "share code missing: {html}");
}

#[test]
fn status_panel_shows_a_warning_countdown() {
    let (mut state, world) = state_in(LocationId::Stonehenge);
    state.location_timer = 25.4;
    state.score = 12_500;
    state.health = 40;
    state.add_key(KeyKind::Stone);
    let view = StatusView::new(&state, &world);
    assert_eq!(view.location_timer, Some(25.4));

    let html = block_on(LocalServerRenderer::<StatusPanel>::with_props(StatusPanelProps { view }).render());
    assert!(html.contains("00:00:25"), "countdown missing: {html}");
    assert!(html.contains("pulsing"), "pulse missing: {html}");
    assert!(html.contains("12,500"), "score missing: {html}");
    assert!(html.contains("Stone Key"), "keys missing: {html}");
}

#[test]
fn status_classes_follow_thresholds() {
    assert_eq!(health_class(100), "healthy");
    assert_eq!(health_class(50), "warning");
    assert_eq!(health_class(-10), "critical");
    assert!(timer_class(5.0).contains("critical"));
    assert!(timer_class(20.0).contains("warning"));
    assert!(!timer_class(0.0).contains("pulsing"));
    assert!(!timer_class(90.0).contains("warning"));
}

#[test]
fn console_renders_tones_as_classes() {
    let mut console = Console::new();
    console.success("🗝 You found the Stone Key!");
    console.blank();
    console.error("❌ You can't go that way!");
    let props = ConsoleViewProps {
        lines: Rc::new(console.lines().to_vec()),
    };
    let html = block_on(LocalServerRenderer::<ConsoleView>::with_props(props).render());
    assert!(html.contains("console-line success"), "tone missing: {html}");
    assert!(html.contains("You can&#x27;t go that way") || html.contains("You can't go that way"));
    assert_eq!(html.matches("console-line").count(), 3);
}

#[test]
fn command_input_can_be_disabled() {
    let props = CommandInputProps {
        on_submit: Callback::noop(),
        disabled: true,
    };
    let html = block_on(LocalServerRenderer::<CommandInput>::with_props(props).render());
    assert!(html.contains("command-input"));
    assert!(html.contains("disabled"), "expected disabled input: {html}");
}

#[test]
fn confirm_dialog_renders_only_when_open() {
    let props = |open| ConfirmDialogProps {
        open,
        title: "🔄 Reset Game?".into(),
        message: "Are you sure you want to start over? All progress will be lost.".into(),
        confirm_label: "Yes, Reset".into(),
        cancel_label: "No, Cancel".into(),
        class: yew::Classes::new(),
        on_confirm: Callback::noop(),
        on_cancel: Callback::noop(),
    };
    let closed = block_on(LocalServerRenderer::<ConfirmDialog>::with_props(props(false)).render());
    assert!(!closed.contains("Reset Game"));
    let open = block_on(LocalServerRenderer::<ConfirmDialog>::with_props(props(true)).render());
    assert!(open.contains("role=\"dialog\""), "dialog role missing: {open}");
    assert!(open.contains("Yes, Reset"));
}

#[test]
fn time_up_popup_names_the_location_and_rank() {
    let (mut state, world) = state_in(LocationId::CrookedForest);
    state.add_key(KeyKind::Triangle);
    state.add_key(KeyKind::Stone);
    let report = FinalReport::from_state(&state, &world, &GameConfig::default());
    let props = OutcomePopupProps {
        notification: Notification::TimeUp,
        report,
        location: "Crooked Forest".into(),
        on_play_again: Callback::noop(),
        on_dismiss: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<OutcomePopup>::with_props(props).render());
    assert!(html.contains("You ran out of time in Crooked Forest!"), "{html}");
    assert!(html.contains("66.7%"), "completion missing: {html}");
    assert!(html.contains("Time Seeker"), "rank missing: {html}");
    assert!(html.contains("game-over-popup"));
}

#[test]
fn last_game_shows_the_recorded_result() {
    let stats = parse_stats(
        200,
        r#"{"username":"marty","lastGameTime":312.4,"lastConstantGameTime":300,"lastGameResult":"won"}"#,
    )
    .unwrap();
    let props = LastGameProps { stats: Some(stats) };
    let html = block_on(LocalServerRenderer::<LastGame>::with_props(props).render());
    assert!(html.contains("🏆 Won"), "verdict missing: {html}");
    assert!(html.contains("00:05:12"), "game time missing: {html}");
    assert!(html.contains("00:05:00"), "real time missing: {html}");
}

#[test]
fn last_game_is_empty_before_the_first_finished_game() {
    let fresh = parse_stats(200, r#"{"username":"marty"}"#).unwrap();
    for stats in [None, Some(fresh)] {
        let html = block_on(LocalServerRenderer::<LastGame>::with_props(LastGameProps { stats }).render());
        assert!(!html.contains("last-game"), "unexpected panel: {html}");
    }
}
