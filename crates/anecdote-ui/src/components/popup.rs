//! First-run notice popup.

use crate::components::modal::{AnimatedModal, use_modal};
use crate::components::raw_html::RawHtml;
use crate::core::modal::CloseTrigger;
use crate::core::popup::{POPUP_OPEN_DELAY_MS, PopupConfig};
use crate::services::storage::BrowserStorage;
use gloo_timers::callback::Timeout;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct NoticePopupProps {
    pub(crate) config: Rc<PopupConfig>,
}

#[function_component(NoticePopup)]
pub(crate) fn notice_popup(props: &NoticePopupProps) -> Html {
    let modal = use_modal(props.config.animation_ms());

    {
        let modal = modal.clone();
        let config = props.config.clone();
        use_effect_with_deps(
            move |_| {
                let (dismissed, dismissed_time) = BrowserStorage.popup_dismissal();
                let opener = config
                    .should_show(dismissed, dismissed_time.as_deref())
                    .then(|| Timeout::new(POPUP_OPEN_DELAY_MS, move || modal.open()));
                move || drop(opener)
            },
            (),
        );
    }

    let dismiss = {
        let modal = modal.clone();
        let config = props.config.clone();
        Callback::from(move |trigger: CloseTrigger| {
            BrowserStorage.persist_popup_dismissal(config.dismissal_time());
            modal.close(trigger);
        })
    };
    let on_button = {
        let dismiss = dismiss.clone();
        Callback::from(move |_: MouseEvent| dismiss.emit(CloseTrigger::CloseControl))
    };

    html! {
        <AnimatedModal
            id="prePopup"
            class="pre-popup"
            state={modal.snapshot()}
            closable={false}
            title={AttrValue::from(props.config.title_or_default().to_string())}
            on_close={dismiss}
        >
            <RawHtml id="prePopupContent" markup={AttrValue::from(props.config.body_html())} />
            <button id="prePopupButton" onclick={on_button}>
                {props.config.button_or_default().to_string()}
            </button>
        </AnimatedModal>
    }
}
