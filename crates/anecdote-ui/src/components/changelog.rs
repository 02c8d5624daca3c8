//! Update-log viewer: fetched on every open and rendered from Markdown.

use crate::app::AppCtx;
use crate::components::modal::AnimatedModal;
use crate::components::raw_html::RawHtml;
use crate::core::markdown;
use crate::core::modal::{CloseTrigger, ModalPhase, ModalState};
use crate::services::documents::load_changelog;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
enum LogView {
    Loading,
    Ready(AttrValue),
    Failed,
}

#[derive(Properties, PartialEq)]
pub(crate) struct ChangelogModalProps {
    pub(crate) state: ModalState,
    pub(crate) on_close: Callback<CloseTrigger>,
}

#[function_component(ChangelogModal)]
pub(crate) fn changelog_modal(props: &ChangelogModalProps) -> Html {
    let ctx = use_context::<AppCtx>();
    let view = use_state(|| LogView::Loading);

    {
        let view = view.clone();
        use_effect_with_deps(
            move |phase: &ModalPhase| {
                if let (ModalPhase::Visible, Some(ctx)) = (*phase, ctx) {
                    view.set(LogView::Loading);
                    yew::platform::spawn_local(async move {
                        match load_changelog(&ctx.config).await {
                            Ok(source) => view.set(LogView::Ready(markdown::to_html(&source).into())),
                            Err(err) => {
                                gloo::console::error!("update log load failed", format!("{err:#}"));
                                view.set(LogView::Failed);
                            }
                        }
                    });
                }
                || ()
            },
            props.state.phase(),
        );
    }

    let body = match &*view {
        LogView::Loading => html! { <p class="loading">{"加载中..."}</p> },
        LogView::Ready(markup) => html! { <RawHtml class="update-log-body" markup={markup.clone()} /> },
        LogView::Failed => html! { <p class="error">{"更新日志加载失败，请稍后再试。"}</p> },
    };

    html! {
        <AnimatedModal
            id="update-log-modal"
            state={props.state}
            title={AttrValue::from("更新日志")}
            on_close={props.on_close.clone()}
        >
            {body}
        </AnimatedModal>
    }
}
