use chronos_game::{GameState, World, encode_share_code, format_clock, format_points};
use yew::prelude::*;

/// Everything the status panel shows, detached from the session borrow.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub location: AttrValue,
    pub time_effect: AttrValue,
    pub constant_game_time: f64,
    pub game_time: f64,
    /// `None` in the hub and the vault, which have no countdown.
    pub location_timer: Option<f64>,
    pub health: i32,
    pub max_health: i32,
    pub keys: AttrValue,
    pub score: u64,
    pub share_code: AttrValue,
}

impl StatusView {
    #[must_use]
    pub fn new(state: &GameState, world: &World) -> Self {
        let here = world.location(state.location);
        Self {
            location: AttrValue::from(state.location.name()),
            time_effect: AttrValue::from(here.time_effect.label()),
            constant_game_time: state.constant_game_time,
            game_time: state.game_time,
            location_timer: state
                .in_timed_location()
                .then_some(state.location_timer.max(0.0)),
            health: state.health,
            max_health: chronos_game::constants::MAX_HEALTH,
            keys: AttrValue::from(state.keys_label()),
            score: state.score,
            share_code: AttrValue::from(encode_share_code(world.seed())),
        }
    }
}

#[must_use]
pub const fn health_class(health: i32) -> &'static str {
    if health <= 25 {
        "critical"
    } else if health <= 50 {
        "warning"
    } else {
        "healthy"
    }
}

#[must_use]
pub fn timer_class(remaining: f64) -> Classes {
    let mut class = classes!("status-value");
    if remaining <= 10.0 {
        class.push("critical");
    } else if remaining <= 30.0 {
        class.push("warning");
    }
    if remaining > 0.0 && remaining <= 30.0 {
        class.push("pulsing");
    }
    class
}

#[derive(Properties, PartialEq, Clone)]
pub struct StatusPanelProps {
    pub view: StatusView,
}

#[function_component(StatusPanel)]
pub fn status_panel(props: &StatusPanelProps) -> Html {
    let view = &props.view;
    let timer = view.location_timer.map_or_else(
        || html! { <span class="status-value">{ "--:--:--" }</span> },
        |secs| html! { <span class={timer_class(secs)}>{ format_clock(secs) }</span> },
    );
    let health = classes!("status-value", health_class(view.health));
    html! {
        <div id="status-panel" aria-live="polite">
            <div class="status-item">
                <span class="status-label">{ "🕒 Constant Game Time:" }</span>
                <span class="status-value">{ format_clock(view.constant_game_time) }</span>
            </div>
            <div class="status-item">
                <span class="status-label">{ "⏰ Game Time:" }</span>
                <span class="status-value">{ format_clock(view.game_time) }</span>
            </div>
            <div class="status-item">
                <span class="status-label">{ "⏱ Location Timer:" }</span>
                { timer }
            </div>
            <div class="status-item">
                <span class="status-label">{ "📍 Location:" }</span>
                <span class="status-value">
                    { view.location.clone() }
                    <small class="time-effect">{ format!(" [{}]", view.time_effect) }</small>
                </span>
            </div>
            <div class="status-item">
                <span class="status-label">{ "💖 Health:" }</span>
                <span class={health}>{ format!("{}/{}", view.health, view.max_health) }</span>
            </div>
            <div class="status-item">
                <span class="status-label">{ "🔑 Keys:" }</span>
                <span class="status-value">{ view.keys.clone() }</span>
            </div>
            <div class="status-item">
                <span class="status-label">{ "🏆 Score:" }</span>
                <span class="status-value">{ format_points(view.score) }</span>
            </div>
            <div class="status-item">
                <span class="status-label">{ "🌐 World:" }</span>
                <span class="status-value share-code">{ view.share_code.clone() }</span>
            </div>
        </div>
    }
}
