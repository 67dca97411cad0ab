use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CommandInputProps {
    pub on_submit: Callback<String>,
    #[prop_or_default]
    pub disabled: bool,
}

/// Single-line command prompt. Enter submits and clears the field.
#[function_component(CommandInput)]
pub fn command_input(props: &CommandInputProps) -> Html {
    let value = use_state(String::new);

    let oninput = {
        let value = value.clone();
        Callback::from(move |e: InputEvent| {
            value.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let onkeydown = {
        let value = value.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                e.prevent_default();
                on_submit.emit((*value).clone());
                value.set(String::new());
            }
        })
    };

    html! {
        <div id="input-container">
            <span class="prompt">{ ">" }</span>
            <input
                id="command-input"
                type="text"
                autocomplete="off"
                placeholder="Type a command (help, north, collect, treasure...)"
                aria-label="Command"
                value={(*value).clone()}
                disabled={props.disabled}
                {oninput}
                {onkeydown}
            />
        </div>
    }
}
