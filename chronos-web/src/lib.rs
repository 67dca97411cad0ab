#![forbid(unsafe_code)]
//! Browser front end for Chronos: The Dawn.
//!
//! Hosts the game session from `chronos-game` inside a Yew app: the login
//! page talks to the auth collaborator, the game page drives the tick engine
//! from a 100 ms interval and persists to `localStorage`.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod api;
pub mod app;
pub mod clock;
pub mod components;
pub mod dom;
pub mod logging;
pub mod pages;
pub mod router;
pub mod storage;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
    yew::Renderer::<app::App>::new().render();
}
