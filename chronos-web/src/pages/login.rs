use chronos_game::PlayerIdentity;
use gloo::timers::future::TimeoutFuture;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api::{self, LoginRequest, SignupRequest};
use crate::storage;

const REDIRECT_DELAY_MS: u32 = 1_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Signup,
            Self::Signup => Self::Login,
        }
    }

    #[must_use]
    pub const fn subtitle(self) -> &'static str {
        match self {
            Self::Login => "Login to continue your adventure",
            Self::Signup => "Create your account",
        }
    }

    #[must_use]
    pub const fn submit_label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Sign Up",
        }
    }

    #[must_use]
    pub const fn toggle_label(self) -> &'static str {
        match self {
            Self::Login => "Need an account? Sign up",
            Self::Signup => "Already have an account? Login",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AuthForm {
    fn login_request(&self) -> LoginRequest {
        LoginRequest {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }

    fn signup_request(&self) -> SignupRequest {
        SignupRequest {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Email,
    Password,
}

impl Field {
    fn apply(self, form: &AuthForm, value: String) -> AuthForm {
        let mut next = form.clone();
        match self {
            Self::Username => next.username = value,
            Self::Email => next.email = value,
            Self::Password => next.password = value,
        }
        next
    }
}

/// Status line under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessage {
    pub text: String,
    pub success: bool,
}

impl FormMessage {
    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct LoginPageProps {
    pub on_back: Callback<()>,
    pub on_logged_in: Callback<PlayerIdentity>,
    #[prop_or_default]
    pub initial_mode: AuthMode,
}

fn field_input(form: &UseStateHandle<AuthForm>, field: Field) -> Callback<InputEvent> {
    let form = form.clone();
    Callback::from(move |e: InputEvent| {
        let value = e.target_unchecked_into::<HtmlInputElement>().value();
        form.set(field.apply(&form, value));
    })
}

#[function_component(LoginPage)]
pub fn login_page(props: &LoginPageProps) -> Html {
    let mode = use_state(|| props.initial_mode);
    let form = use_state(AuthForm::default);
    let message = use_state(|| None::<FormMessage>);
    let loading = use_state(|| false);

    let onsubmit = {
        let mode = mode.clone();
        let form = form.clone();
        let message = message.clone();
        let loading = loading.clone();
        let on_logged_in = props.on_logged_in.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *loading {
                return;
            }
            loading.set(true);
            message.set(None);
            let current = *mode;
            let values = (*form).clone();
            let mode = mode.clone();
            let form = form.clone();
            let message = message.clone();
            let loading = loading.clone();
            let on_logged_in = on_logged_in.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match current {
                    AuthMode::Login => match api::login(&values.login_request()).await {
                        Ok(identity) => {
                            if let Err(err) = storage::store_identity(&identity) {
                                log::warn!("could not remember login: {err}");
                            }
                            message.set(Some(FormMessage::success(
                                "✅ Login successful! Redirecting to game...",
                            )));
                            loading.set(false);
                            TimeoutFuture::new(REDIRECT_DELAY_MS).await;
                            on_logged_in.emit(identity);
                            return;
                        }
                        Err(err) => {
                            log::info!("login failed: {err}");
                            message.set(Some(FormMessage::error(err.user_message())));
                        }
                    },
                    AuthMode::Signup => match api::signup(&values.signup_request()).await {
                        Ok(_) => {
                            message.set(Some(FormMessage::success(
                                "✅ Account created successfully! You can now login.",
                            )));
                            mode.set(AuthMode::Login);
                            form.set(AuthForm::default());
                        }
                        Err(err) => {
                            log::info!("signup failed: {err}");
                            message.set(Some(FormMessage::error(err.user_message())));
                        }
                    },
                }
                loading.set(false);
            });
        })
    };

    let toggle = {
        let mode = mode.clone();
        let form = form.clone();
        let message = message.clone();
        Callback::from(move |_| {
            mode.set(mode.toggled());
            form.set(AuthForm::default());
            message.set(None);
        })
    };

    let back = {
        let cb = props.on_back.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let email = (*mode == AuthMode::Signup).then(|| {
        html! {
            <div class="input-group">
                <label for="auth-email">{ "Email:" }</label>
                <input id="auth-email" type="email" name="email" required=true
                    placeholder="Enter your email"
                    value={form.email.clone()}
                    oninput={field_input(&form, Field::Email)} />
            </div>
        }
    });

    let status = (*message).as_ref().map(|msg| {
        let class = classes!("auth-message", if msg.success { "success" } else { "error" });
        html! { <div class={class} role="status">{ msg.text.clone() }</div> }
    });

    let submit_label = if *loading {
        "Processing..."
    } else {
        mode.submit_label()
    };

    html! {
        <main class="auth-screen" data-testid="login-screen">
            <div class="auth-card">
                <button type="button" class="back-button" onclick={back}>{ "← Back to Homepage" }</button>
                <h1 class="auth-title">{ "Chronos: The Dawn" }</h1>
                <p class="auth-subtitle">{ mode.subtitle() }</p>
                <form class="auth-form" {onsubmit}>
                    { email }
                    <div class="input-group">
                        <label for="auth-username">{ "Username:" }</label>
                        <input id="auth-username" type="text" name="username" required=true
                            placeholder="Enter your username"
                            value={form.username.clone()}
                            oninput={field_input(&form, Field::Username)} />
                    </div>
                    <div class="input-group">
                        <label for="auth-password">{ "Password:" }</label>
                        <input id="auth-password" type="password" name="password" required=true
                            placeholder="Enter your password"
                            value={form.password.clone()}
                            oninput={field_input(&form, Field::Password)} />
                    </div>
                    <button type="submit" class="auth-submit" disabled={*loading}>{ submit_label }</button>
                </form>
                <button type="button" class="toggle-button" onclick={toggle}>{ mode.toggle_label() }</button>
                { status }
            </div>
        </main>
    }
}
