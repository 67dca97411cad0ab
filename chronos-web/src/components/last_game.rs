use chronos_game::format_clock;
use yew::prelude::*;

use crate::api::PlayerStats;

#[derive(Properties, PartialEq, Clone)]
pub struct LastGameProps {
    #[prop_or_default]
    pub stats: Option<PlayerStats>,
}

/// Result of the player's previous finished game, as recorded by the stats collaborator.
#[function_component(LastGame)]
pub fn last_game(props: &LastGameProps) -> Html {
    let Some(stats) = props.stats.as_ref() else {
        return Html::default();
    };
    let Some(verdict) = stats.verdict() else {
        return Html::default();
    };
    html! {
        <div class="last-game" data-testid="last-game">
            <span class="status-label">{ "Last game:" }</span>
            <span class={classes!("status-value", stats.won().then_some("won"))}>{ verdict }</span>
            <span class="status-label">{ "Game time:" }</span>
            <span class="status-value">{ format_clock(stats.last_game_time) }</span>
            <span class="status-label">{ "Real time:" }</span>
            <span class="status-value">{ format_clock(stats.last_constant_game_time) }</span>
        </div>
    }
}
