//! The playable screen: console, status panel, command prompt and popups.
use std::cell::RefCell;
use std::rc::Rc;

use chronos_game::{
    GameSession, PlayerIdentity, SessionDeps, World, decode_share_code, share_code_from_entropy,
};
use gloo::timers::callback::Interval;
use yew::prelude::*;

use crate::api::{self, HttpStatsReporter, PlayerStats};
use crate::clock::BrowserClock;
use crate::components::command_input::CommandInput;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::console_view::ConsoleView;
use crate::components::last_game::LastGame;
use crate::components::outcome_popup::OutcomePopup;
use crate::components::status_panel::{StatusPanel, StatusView};
use crate::storage::{self, BrowserStorage};

pub type WebSession = GameSession<BrowserStorage, BrowserClock, HttpStatsReporter>;

/// A world with a fresh share code, so every game can be named and replayed.
#[must_use]
pub fn new_world() -> World {
    let code = share_code_from_entropy(rand::random());
    decode_share_code(&code).map_or_else(World::unseeded, World::build)
}

fn start_session(player: PlayerIdentity) -> WebSession {
    let deps = SessionDeps::new(BrowserStorage, BrowserClock, HttpStatsReporter);
    let session = GameSession::start(new_world(), deps).with_player(Some(player));
    log::info!(
        "game session opened ({:?}) at {}",
        session.load_source(),
        session.state().location.name()
    );
    session
}

#[derive(Properties, PartialEq, Clone)]
pub struct GamePageProps {
    pub identity: PlayerIdentity,
    pub on_logout: Callback<()>,
}

#[function_component(GamePage)]
pub fn game_page(props: &GamePageProps) -> Html {
    let session: Rc<RefCell<WebSession>> = {
        let identity = props.identity.clone();
        use_mut_ref(move || start_session(identity))
    };
    let redraw = use_force_update();
    let reset_open = use_state(|| false);
    let logout_open = use_state(|| false);
    let last_stats = use_state(|| None::<PlayerStats>);

    {
        let last_stats = last_stats.clone();
        use_effect_with(props.identity.user_id.clone(), move |user_id| {
            if !user_id.is_empty() {
                let user_id = user_id.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match api::fetch_stats(&user_id).await {
                        Ok(stats) => last_stats.set(Some(stats)),
                        Err(err) => log::warn!("could not load last game: {err}"),
                    }
                });
            }
            || ()
        });
    }

    let active = session.borrow().is_active();
    {
        let session = Rc::clone(&session);
        let redraw = redraw.clone();
        use_effect_with(active, move |active| {
            let ticker = (*active).then(|| {
                let period = u32::try_from(session.borrow().tick_interval_ms()).unwrap_or(u32::MAX);
                Interval::new(period, move || {
                    session.borrow_mut().tick();
                    redraw.force_update();
                })
            });
            move || drop(ticker)
        });
    }

    let on_command = {
        let session = Rc::clone(&session);
        let redraw = redraw.clone();
        Callback::from(move |line: String| {
            session.borrow_mut().submit(&line);
            redraw.force_update();
        })
    };

    let do_reset = {
        let session = Rc::clone(&session);
        let redraw = redraw.clone();
        let reset_open = reset_open.clone();
        Callback::from(move |()| {
            session.borrow_mut().reset(new_world());
            reset_open.set(false);
            redraw.force_update();
        })
    };

    let dismiss = {
        let session = Rc::clone(&session);
        let redraw = redraw.clone();
        Callback::from(move |()| {
            session.borrow_mut().dismiss_notification();
            redraw.force_update();
        })
    };

    let open_reset = {
        let reset_open = reset_open.clone();
        Callback::from(move |_| reset_open.set(true))
    };
    let close_reset = {
        let reset_open = reset_open.clone();
        Callback::from(move |()| reset_open.set(false))
    };
    let open_logout = {
        let logout_open = logout_open.clone();
        Callback::from(move |_| logout_open.set(true))
    };
    let close_logout = {
        let logout_open = logout_open.clone();
        Callback::from(move |()| logout_open.set(false))
    };
    let confirm_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |()| {
            storage::clear_identity();
            on_logout.emit(());
        })
    };

    let current = session.borrow();
    let view = StatusView::new(current.state(), current.world());
    let lines = Rc::new(current.console().lines().to_vec());
    let popup = current.notification().map(|notification| {
        html! {
            <OutcomePopup
                {notification}
                report={current.final_report()}
                location={current.state().location.name()}
                on_play_again={do_reset.clone()}
                on_dismiss={dismiss.clone()}
            />
        }
    });
    let welcome = props.identity.username.clone().map(|name| {
        html! { <div class="welcome-user">{ "Welcome, " }<b>{ name }</b></div> }
    });

    html! {
        <div class="game-screen" data-testid="game-screen">
            { popup }
            <ConfirmDialog
                open={*reset_open}
                title="🔄 Reset Game?"
                message="Are you sure you want to start over? All progress will be lost."
                confirm_label="Yes, Reset"
                class={classes!("reset-confirm-popup")}
                on_confirm={do_reset}
                on_cancel={close_reset}
            />
            <ConfirmDialog
                open={*logout_open}
                title="Logout?"
                message="Are you sure you really want to logout of the game?"
                confirm_label="Yes, Logout"
                class={classes!("logout-confirm-popup")}
                on_confirm={confirm_logout}
                on_cancel={close_logout}
            />
            <header class="header">
                <h1>{ "🌀 CHRONOS: THE DAWN 🌀" }</h1>
                { welcome }
                <p>{ "Collect keys and solve puzzles across time-warped locations!" }</p>
                <button type="button" class="logout-button" onclick={open_logout}>{ "🚪 Logout" }</button>
            </header>
            <StatusPanel {view} />
            <LastGame stats={(*last_stats).clone()} />
            <ConsoleView {lines} />
            <CommandInput on_submit={on_command} disabled={!active} />
            <div class="controls">
                <button type="button" class="reset-button" onclick={open_reset}>{ "🔄 Reset Game" }</button>
            </div>
        </div>
    }
}
