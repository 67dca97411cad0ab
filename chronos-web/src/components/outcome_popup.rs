use chronos_game::{FinalReport, Notification, format_clock, format_points};
use yew::prelude::*;

use super::popup::Popup;

#[derive(Properties, PartialEq, Clone)]
pub struct OutcomePopupProps {
    pub notification: Notification,
    pub report: FinalReport,
    pub location: AttrValue,
    pub on_play_again: Callback<()>,
    #[prop_or_default]
    pub on_dismiss: Callback<()>,
}

#[function_component(OutcomePopup)]
pub fn outcome_popup(props: &OutcomePopupProps) -> Html {
    let notification = props.notification;
    let report = &props.report;
    let play_again = {
        let cb = props.on_play_again.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let dismiss = {
        let cb = props.on_dismiss.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let class = match notification {
        Notification::Victory => "win-popup",
        Notification::TimeUp => "game-over-popup",
    };
    let detail = match notification {
        Notification::Victory => html! {},
        Notification::TimeUp => {
            html! { <p>{ format!("You ran out of time in {}!", props.location) }</p> }
        }
    };

    html! {
        <Popup open=true title={notification.title()} class={classes!(class)}>
            <h1>{ notification.title() }</h1>
            <p>{ notification.message() }</p>
            { detail }
            <div class="win-popup-stats">
                <p><strong>{ "🏆 Final Score: " }</strong>{ format_points(report.score) }</p>
                <p><strong>{ "⏰ Game Time: " }</strong>{ format_clock(report.game_time) }</p>
                <p><strong>{ "🕒 Constant Game Time: " }</strong>{ format_clock(report.constant_game_time) }</p>
                <p><strong>{ "📊 Completion: " }</strong>{ report.completion_label() }</p>
                <p><strong>{ "🎖 Rank: " }</strong>{ report.rank.title() }</p>
            </div>
            <div class="popup-buttons">
                <button type="button" class="popup-button-no" onclick={dismiss}>{ "Close" }</button>
                <button type="button" class="play-again-green" onclick={play_again}>{ "🔄 Play Again" }</button>
            </div>
        </Popup>
    }
}
