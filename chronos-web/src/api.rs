//! Client for the auth and stats collaborator.
use chronos_game::{PlayerIdentity, StatsPayload, StatsReporter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dom;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api/auth";

/// Base URL of the collaborator, fixed at compile time by `API_BASE_URL`.
#[must_use]
pub fn api_base() -> &'static str {
    option_env!("API_BASE_URL").unwrap_or(DEFAULT_API_BASE)
}

#[must_use]
pub fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Line shown under the login form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => format!("❌ {message}"),
            Self::Network(_) | Self::Decode(_) => "❌ Connection error. Please try again.".into(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    token: String,
    user: UserBody,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: String,
    username: String,
}

/// Last result stored by the stats collaborator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub last_game_time: f64,
    #[serde(default)]
    pub last_constant_game_time: f64,
    /// `"won"`, `"lost"` or empty before the first finished game.
    #[serde(default)]
    pub last_game_result: String,
}

impl PlayerStats {
    #[must_use]
    pub fn won(&self) -> bool {
        self.last_game_result == "won"
    }

    /// Display label for the last result; `None` before the first finished game.
    #[must_use]
    pub fn verdict(&self) -> Option<&'static str> {
        match self.last_game_result.as_str() {
            "won" => Some("🏆 Won"),
            "lost" => Some("⏰ Lost"),
            _ => None,
        }
    }
}

const fn is_success(status: u16) -> bool {
    matches!(status, 200..=299)
}

fn rejection(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<MessageBody>(body)
        .map(|body| body.message)
        .ok()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("Request failed with status {status}."));
    ApiError::Rejected { status, message }
}

/// Interpret a `/login` response.
///
/// # Errors
/// Non-2xx statuses become [`ApiError::Rejected`] carrying the server message.
pub fn parse_login(status: u16, body: &str) -> Result<PlayerIdentity, ApiError> {
    if !is_success(status) {
        return Err(rejection(status, body));
    }
    let body: LoginBody = serde_json::from_str(body)?;
    Ok(PlayerIdentity {
        user_id: body.user.id,
        token: Some(body.token),
        username: Some(body.user.username),
    })
}

/// Interpret a `/signup` response, returning the server's confirmation.
///
/// # Errors
/// Non-2xx statuses become [`ApiError::Rejected`].
pub fn parse_signup(status: u16, body: &str) -> Result<String, ApiError> {
    if !is_success(status) {
        return Err(rejection(status, body));
    }
    Ok(serde_json::from_str::<MessageBody>(body)?.message)
}

/// Interpret a `GET /stats/:userId` response.
///
/// # Errors
/// Non-2xx statuses become [`ApiError::Rejected`].
pub fn parse_stats(status: u16, body: &str) -> Result<PlayerStats, ApiError> {
    if !is_success(status) {
        return Err(rejection(status, body));
    }
    Ok(serde_json::from_str(body)?)
}

#[allow(clippy::future_not_send)]
async fn send(method: &str, url: &str, body: Option<String>) -> Result<(u16, String), ApiError> {
    let network = |err: wasm_bindgen::JsValue| ApiError::Network(dom::js_error_message(&err));
    let response = dom::fetch_json(method, url, body.as_deref())
        .await
        .map_err(network)?;
    let text = dom::response_text(&response).await.map_err(network)?;
    Ok((response.status(), text))
}

/// # Errors
/// See [`parse_login`]; transport failures are [`ApiError::Network`].
#[allow(clippy::future_not_send)]
pub async fn login(request: &LoginRequest) -> Result<PlayerIdentity, ApiError> {
    let body = serde_json::to_string(request)?;
    let (status, text) = send("POST", &endpoint(api_base(), "login"), Some(body)).await?;
    parse_login(status, &text)
}

/// # Errors
/// See [`parse_signup`]; transport failures are [`ApiError::Network`].
#[allow(clippy::future_not_send)]
pub async fn signup(request: &SignupRequest) -> Result<String, ApiError> {
    let body = serde_json::to_string(request)?;
    let (status, text) = send("POST", &endpoint(api_base(), "signup"), Some(body)).await?;
    parse_signup(status, &text)
}

/// # Errors
/// See [`parse_stats`]; transport failures are [`ApiError::Network`].
#[allow(clippy::future_not_send)]
pub async fn fetch_stats(user_id: &str) -> Result<PlayerStats, ApiError> {
    let url = endpoint(api_base(), &format!("stats/{user_id}"));
    let (status, text) = send("GET", &url, None).await?;
    parse_stats(status, &text)
}

/// # Errors
/// Non-2xx statuses and transport failures.
#[allow(clippy::future_not_send)]
pub async fn post_stats(user_id: &str, payload: &StatsPayload) -> Result<(), ApiError> {
    let url = endpoint(api_base(), &format!("stats/{user_id}"));
    let (status, text) = send("POST", &url, Some(serde_json::to_string(payload)?)).await?;
    if is_success(status) {
        Ok(())
    } else {
        Err(rejection(status, &text))
    }
}

/// Posts outcomes to `/stats/:userId` in the background; failures are logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpStatsReporter;

impl StatsReporter for HttpStatsReporter {
    fn report(&self, player: &PlayerIdentity, payload: &StatsPayload) {
        if player.user_id.is_empty() {
            log::debug!("no user id stored; skipping stats report");
            return;
        }
        let user_id = player.user_id.clone();
        let payload = payload.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = post_stats(&user_id, &payload).await {
                log::warn!("stats report failed: {err}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_without_double_slashes() {
        assert_eq!(
            endpoint("http://localhost:5000/api/auth/", "/login"),
            "http://localhost:5000/api/auth/login"
        );
        assert_eq!(endpoint(DEFAULT_API_BASE, "stats/abc"), format!("{DEFAULT_API_BASE}/stats/abc"));
    }

    #[test]
    fn login_success_yields_identity() {
        let body = r#"{"message":"Login successful!","token":"fake-jwt-token",
            "user":{"id":"64f0c0ffee","username":"marty","email":"m@hill.valley"}}"#;
        let identity = parse_login(200, body).unwrap();
        assert_eq!(identity.user_id, "64f0c0ffee");
        assert_eq!(identity.token.as_deref(), Some("fake-jwt-token"));
        assert_eq!(identity.username.as_deref(), Some("marty"));
    }

    #[test]
    fn rejected_login_surfaces_server_message() {
        let err = parse_login(401, r#"{"message":"Invalid credentials."}"#).unwrap_err();
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 401,
                message: "Invalid credentials.".into()
            }
        );
        assert_eq!(err.user_message(), "❌ Invalid credentials.");
    }

    #[test]
    fn garbled_bodies_read_as_connection_errors() {
        let err = parse_login(200, "<html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(err.user_message(), "❌ Connection error. Please try again.");
    }

    #[test]
    fn signup_returns_confirmation() {
        let message = parse_signup(201, r#"{"message":"User created successfully!"}"#).unwrap();
        assert_eq!(message, "User created successfully!");
        let err = parse_signup(400, r#"{"message":"Email is already in use."}"#).unwrap_err();
        assert_eq!(err.user_message(), "❌ Email is already in use.");
    }

    #[test]
    fn stats_tolerate_missing_history() {
        let stats = parse_stats(200, r#"{"username":"marty","email":"m@hill.valley"}"#).unwrap();
        assert!(stats.last_game_result.is_empty());
        assert_eq!(stats.verdict(), None);
        assert!(stats.last_game_time.abs() < f64::EPSILON);

        let stats = parse_stats(
            200,
            r#"{"username":"marty","lastGameTime":-12.5,"lastConstantGameTime":300,"lastGameResult":"won"}"#,
        )
        .unwrap();
        assert_eq!(stats.last_game_result, "won");
        assert_eq!(stats.verdict(), Some("🏆 Won"));
        assert!((stats.last_constant_game_time - 300.0).abs() < f64::EPSILON);
        assert!(matches!(parse_stats(404, "{}"), Err(ApiError::Rejected { status: 404, .. })));
    }

    #[test]
    fn requests_serialize_like_the_form() {
        let json = serde_json::to_value(SignupRequest {
            email: "m@hill.valley".into(),
            username: "marty".into(),
            password: "flux".into(),
        })
        .unwrap();
        assert_eq!(json["email"], "m@hill.valley");
        assert_eq!(json["username"], "marty");
    }
}
