//! Scroll-to-top button.

use crate::core::ui::scroll_top_visible;
use gloo::events::EventListener;
use gloo::utils::window;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ScrollTopProps {
    pub(crate) threshold: u32,
}

#[function_component(ScrollTopButton)]
pub(crate) fn scroll_top_button(props: &ScrollTopProps) -> Html {
    let visible = use_state_eq(|| false);
    {
        let visible = visible.clone();
        use_effect_with_deps(
            move |threshold: &u32| {
                let threshold = *threshold;
                let listener = EventListener::new(&window(), "scroll", move |_| {
                    let offset = window().scroll_y().unwrap_or(0.0);
                    visible.set(scroll_top_visible(offset, threshold));
                });
                move || drop(listener)
            },
            props.threshold,
        );
    }

    let on_click = Callback::from(|_: MouseEvent| {
        let options = web_sys::ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(web_sys::ScrollBehavior::Smooth);
        window().scroll_to_with_scroll_to_options(&options);
    });

    html! {
        <button
            class="scroll-top"
            style={if *visible { "display: block;" } else { "display: none;" }}
            onclick={on_click}
        >
            {"↑"}
        </button>
    }
}
