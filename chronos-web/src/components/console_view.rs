use std::rc::Rc;

use chronos_game::LogLine;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ConsoleViewProps {
    pub lines: Rc<Vec<LogLine>>,
}

/// Scrolling game console; keeps the newest line in view.
#[function_component(ConsoleView)]
pub fn console_view(props: &ConsoleViewProps) -> Html {
    let node = use_node_ref();
    {
        let node = node.clone();
        use_effect_with(props.lines.len(), move |_| {
            if let Some(el) = node.cast::<web_sys::Element>() {
                el.set_scroll_top(el.scroll_height());
            }
        });
    }
    html! {
        <div id="console" ref={node} role="log" aria-live="polite">
            { for props.lines.iter().map(|line| {
                let class = classes!("console-line", line.tone.css_class());
                if line.text.is_empty() {
                    html! { <div class={class}>{ "\u{a0}" }</div> }
                } else {
                    html! { <div class={class}>{ line.text.clone() }</div> }
                }
            }) }
        </div>
    }
}
