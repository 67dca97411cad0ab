use chronos_game::{GameState, World, decode_share_code, encode_share_code};
use chronos_web::api::{ApiError, DEFAULT_API_BASE, api_base, endpoint, parse_login};
use chronos_web::components::status_panel::StatusView;
use chronos_web::pages::game::new_world;
use chronos_web::router::Route;
use yew_router::Routable;

#[test]
fn api_base_defaults_to_the_local_collaborator() {
    if option_env!("API_BASE_URL").is_none() {
        assert_eq!(api_base(), DEFAULT_API_BASE);
    }
    assert!(endpoint(api_base(), "login").ends_with("/login"));
}

#[test]
fn missing_server_message_falls_back_to_status() {
    let err = parse_login(500, "").unwrap_err();
    assert_eq!(
        err,
        ApiError::Rejected {
            status: 500,
            message: "Request failed with status 500.".into()
        }
    );
}

#[test]
fn routes_cover_the_three_screens() {
    assert_eq!(Route::recognize("/"), Some(Route::Home));
    assert_eq!(Route::recognize("/login"), Some(Route::Login));
    assert_eq!(Route::recognize("/game"), Some(Route::Game));
}

#[test]
fn new_worlds_carry_a_share_code() {
    let world = new_world();
    let code = encode_share_code(world.seed());
    assert_eq!(decode_share_code(&code), Some(world.seed()));

    let state = GameState::default().with_world_seed(world.seed());
    let view = StatusView::new(&state, &world);
    assert_eq!(view.share_code.as_str(), code);
}

#[test]
fn status_view_tracks_the_world_it_was_built_from() {
    let seed = decode_share_code("CH-VORTEX13").unwrap();
    let world = World::build(seed);
    let view = StatusView::new(&GameState::default(), &world);
    assert_eq!(view.share_code.as_str(), "CH-VORTEX13");
}
