//! Small dialogs: "more options" and the font-license chooser.

use crate::components::modal::AnimatedModal;
use crate::core::modal::{CloseTrigger, ModalState};
use crate::core::ui::FontPreference;
use yew::prelude::*;

/// Entries offered by the "more options" dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MoreOption {
    UpdateLog,
    FontLicense,
    Feedback,
    NewVersion,
}

#[derive(Properties, PartialEq)]
pub(crate) struct MoreOptionsProps {
    pub(crate) state: ModalState,
    pub(crate) on_close: Callback<CloseTrigger>,
    pub(crate) on_pick: Callback<MoreOption>,
}

#[function_component(MoreOptionsModal)]
pub(crate) fn more_options_modal(props: &MoreOptionsProps) -> Html {
    let entry = |id: &'static str, label: &'static str, option: MoreOption| {
        let on_pick = props.on_pick.clone();
        html! {
            <button id={id} class="more-option" onclick={Callback::from(move |_: MouseEvent| on_pick.emit(option))}>
                {label}
            </button>
        }
    };
    html! {
        <AnimatedModal
            id="more-options-modal"
            state={props.state}
            title={AttrValue::from("更多选项")}
            on_close={props.on_close.clone()}
        >
            <div class="more-options">
                {entry("update-log-btn", "更新日志", MoreOption::UpdateLog)}
                {entry("font-license-btn", "字体授权设置", MoreOption::FontLicense)}
                {entry("feedback-btn", "问题反馈", MoreOption::Feedback)}
                {entry("new-version-btn", "体验新版本", MoreOption::NewVersion)}
            </div>
        </AnimatedModal>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct FontLicenseProps {
    pub(crate) state: ModalState,
    pub(crate) on_close: Callback<CloseTrigger>,
    pub(crate) on_choose: Callback<FontPreference>,
}

#[function_component(FontLicenseModal)]
pub(crate) fn font_license_modal(props: &FontLicenseProps) -> Html {
    let choose = |preference: FontPreference| {
        let on_choose = props.on_choose.clone();
        Callback::from(move |_: MouseEvent| on_choose.emit(preference))
    };
    html! {
        <AnimatedModal
            id="font-license-modal"
            state={props.state}
            title={AttrValue::from("字体授权设置")}
            on_close={props.on_close.clone()}
        >
            <p>
                {"本页面默认使用衍生字体以减小加载体积。如需使用原始授权字体，可在此切换；切换后页面将自动刷新。"}
            </p>
            <div class="font-actions">
                <button id="restore-original-font" onclick={choose(FontPreference::Original)}>
                    {"恢复原始授权字体"}
                </button>
                <button id="use-derived-font" onclick={choose(FontPreference::Derived)}>
                    {"重新使用衍生字体"}
                </button>
            </div>
        </AnimatedModal>
    }
}
