#[cfg(target_arch = "wasm32")]
use crate::pages::{game::GamePage, home::HomePage, login::LoginPage};
#[cfg(target_arch = "wasm32")]
use crate::router::Route;
#[cfg(target_arch = "wasm32")]
use chronos_game::PlayerIdentity;
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;
#[cfg(target_arch = "wasm32")]
use yew_router::prelude::*;

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

#[cfg(target_arch = "wasm32")]
fn switch(route: Route) -> Html {
    let identity = route
        .requires_login()
        .then(crate::storage::load_identity)
        .flatten();
    match route {
        Route::Home => html! { <HomeRoute /> },
        Route::Login => html! { <LoginRoute /> },
        Route::Game => identity.map_or_else(
            || html! { <Redirect<Route> to={Route::Login} /> },
            |identity| html! { <GameRoute {identity} /> },
        ),
        Route::NotFound => html! { <Redirect<Route> to={Route::Home} /> },
    }
}

#[cfg(target_arch = "wasm32")]
fn go_to(navigator: Option<Navigator>, route: Route) -> Callback<()> {
    Callback::from(move |()| {
        if let Some(nav) = navigator.as_ref() {
            nav.push(&route);
        }
    })
}

#[cfg(target_arch = "wasm32")]
#[function_component(HomeRoute)]
fn home_route() -> Html {
    let on_play = go_to(use_navigator(), Route::Login);
    html! { <HomePage {on_play} /> }
}

#[cfg(target_arch = "wasm32")]
#[function_component(LoginRoute)]
fn login_route() -> Html {
    let navigator = use_navigator();
    let on_back = go_to(navigator.clone(), Route::Home);
    let enter_game = go_to(navigator, Route::Game);
    let on_logged_in = Callback::from(move |identity: PlayerIdentity| {
        log::info!("signed in as {}", identity.username.as_deref().unwrap_or("player"));
        enter_game.emit(());
    });
    html! { <LoginPage {on_back} {on_logged_in} /> }
}

#[cfg(target_arch = "wasm32")]
#[derive(Properties, PartialEq, Clone)]
struct GameRouteProps {
    identity: PlayerIdentity,
}

#[cfg(target_arch = "wasm32")]
#[function_component(GameRoute)]
fn game_route(props: &GameRouteProps) -> Html {
    let on_logout = go_to(use_navigator(), Route::Login);
    html! { <GamePage identity={props.identity.clone()} {on_logout} /> }
}
