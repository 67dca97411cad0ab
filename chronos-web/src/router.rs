use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/game")]
    Game,
    #[at("/404")]
    #[not_found]
    NotFound,
}

impl Route {
    /// Routes that bounce to the login page without a stored token.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Game)
    }
}
