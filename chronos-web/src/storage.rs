//! `localStorage` persistence: the game save slot and the signed-in player.
use chronos_game::{GameStorage, PlayerIdentity};
use gloo::storage::{LocalStorage, Storage};
use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::dom;

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";
pub const USER_ID_KEY: &str = "userId";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebStorageError {
    #[error("localStorage {op} failed: {message}")]
    Js { op: &'static str, message: String },
}

impl WebStorageError {
    fn js(op: &'static str, value: &JsValue) -> Self {
        Self::Js {
            op,
            message: dom::js_error_message(value),
        }
    }
}

// Values are stored verbatim; gloo's typed accessors would JSON-quote them.
fn read(key: &str) -> Result<Option<String>, WebStorageError> {
    LocalStorage::raw()
        .get_item(key)
        .map_err(|err| WebStorageError::js("getItem", &err))
}

fn write(key: &str, value: &str) -> Result<(), WebStorageError> {
    LocalStorage::raw()
        .set_item(key, value)
        .map_err(|err| WebStorageError::js("setItem", &err))
}

/// Save slot backed by `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl GameStorage for BrowserStorage {
    type Error = WebStorageError;

    fn load_raw(&self, key: &str) -> Result<Option<String>, Self::Error> {
        read(key)
    }

    fn save_raw(&self, key: &str, payload: &str) -> Result<(), Self::Error> {
        write(key, payload)
    }

    fn delete_save(&self, key: &str) -> Result<(), Self::Error> {
        LocalStorage::delete(key);
        Ok(())
    }
}

/// The player stored by the last successful login, if any.
///
/// A session counts as signed in when a token is present; `userId` may be
/// missing for players who signed in before ids were stored.
#[must_use]
pub fn load_identity() -> Option<PlayerIdentity> {
    let entry = |key: &str| read(key).ok().flatten();
    let token = entry(TOKEN_KEY)?;
    Some(PlayerIdentity {
        user_id: entry(USER_ID_KEY).unwrap_or_default(),
        token: Some(token),
        username: entry(USERNAME_KEY),
    })
}

/// Remember a signed-in player.
///
/// # Errors
/// Returns an error if any of the entries cannot be written.
pub fn store_identity(identity: &PlayerIdentity) -> Result<(), WebStorageError> {
    let entries = [
        (TOKEN_KEY, identity.token.as_deref()),
        (USERNAME_KEY, identity.username.as_deref()),
        (USER_ID_KEY, Some(identity.user_id.as_str())),
    ];
    for (key, value) in entries {
        if let Some(value) = value {
            write(key, value)?;
        }
    }
    Ok(())
}

/// Forget the signed-in player.
pub fn clear_identity() {
    for key in [TOKEN_KEY, USERNAME_KEY, USER_ID_KEY] {
        LocalStorage::delete(key);
    }
}
