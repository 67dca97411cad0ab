use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct PopupProps {
    pub open: bool,
    pub title: AttrValue,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub children: Children,
}

/// Overlay dialog used for the outcome and confirmation popups.
#[function_component(Popup)]
pub fn popup(props: &PopupProps) -> Html {
    if !props.open {
        return Html::default();
    }
    let class = classes!("popup-content", props.class.clone());
    html! {
        <div class="popup-overlay" role="dialog" aria-modal="true" aria-label={props.title.clone()}>
            <div class={class}>
                { for props.children.iter() }
            </div>
        </div>
    }
}
