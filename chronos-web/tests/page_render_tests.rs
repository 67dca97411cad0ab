use chronos_web::pages::home::{HomePage, HomePageProps};
use chronos_web::pages::login::{AuthMode, LoginPage, LoginPageProps};
use futures::executor::block_on;
use yew::{Callback, LocalServerRenderer};

#[test]
fn home_page_introduces_the_locations() {
    let props = HomePageProps {
        on_play: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<HomePage>::with_props(props).render());
    for name in ["Stonehenge", "Crooked Forest", "Bermuda Triangle"] {
        assert!(html.contains(name), "{name} missing: {html}");
    }
    assert!(html.contains("▶ Play Game"));
}

#[test]
fn login_page_starts_in_login_mode_by_default() {
    let props = LoginPageProps {
        on_back: Callback::noop(),
        on_logged_in: Callback::noop(),
        initial_mode: AuthMode::default(),
    };
    let html = block_on(LocalServerRenderer::<LoginPage>::with_props(props).render());
    assert!(html.contains("← Back to Homepage"));
    assert!(html.contains(">Login<"), "submit label missing: {html}");
    assert!(!html.contains("auth-message"), "no status before submitting: {html}");
}
