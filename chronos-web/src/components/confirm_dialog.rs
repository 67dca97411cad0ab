use yew::prelude::*;

use super::popup::Popup;

#[derive(Properties, PartialEq, Clone)]
pub struct ConfirmDialogProps {
    pub open: bool,
    pub title: AttrValue,
    pub message: AttrValue,
    pub confirm_label: AttrValue,
    #[prop_or(AttrValue::Static("No, Cancel"))]
    pub cancel_label: AttrValue,
    #[prop_or_default]
    pub class: Classes,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
}

#[function_component(ConfirmDialog)]
pub fn confirm_dialog(props: &ConfirmDialogProps) -> Html {
    let confirm = {
        let cb = props.on_confirm.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let cancel = {
        let cb = props.on_cancel.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <Popup open={props.open} title={props.title.clone()} class={props.class.clone()}>
            <h2>{ props.title.clone() }</h2>
            <p>{ props.message.clone() }</p>
            <div class="popup-buttons">
                <button type="button" class="popup-button-no" onclick={cancel}>
                    { props.cancel_label.clone() }
                </button>
                <button type="button" class="popup-button-yes" onclick={confirm}>
                    { props.confirm_label.clone() }
                </button>
            </div>
        </Popup>
    }
}
