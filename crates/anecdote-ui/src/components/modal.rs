//! Animated modal shell and the hook that drives it.
//!
//! # Design
//! - The authoritative `ModalState` lives in a mutable ref so the close timer always
//!   sees the latest phase; renders read a copy.
//! - Escape is only listened for while the modal is visible.

use crate::core::modal::{CloseTrigger, ModalPhase, ModalState};
use gloo::events::EventListener;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use yew::prelude::*;

/// Handle returned by [`use_modal`].
#[derive(Clone)]
pub(crate) struct ModalHandle {
    state: Rc<RefCell<ModalState>>,
    timer: Rc<RefCell<Option<Timeout>>>,
    redraw: UseForceUpdateHandle,
}

impl ModalHandle {
    /// Copy of the current state for rendering.
    pub(crate) fn snapshot(&self) -> ModalState {
        *self.state.borrow()
    }

    pub(crate) fn open(&self) {
        self.timer.borrow_mut().take();
        self.state.borrow_mut().open();
        self.redraw.force_update();
    }

    pub(crate) fn close(&self, trigger: CloseTrigger) {
        self.close_then(trigger, || ());
    }

    /// Close with animation and run `after` once the modal is hidden.
    pub(crate) fn close_then(&self, trigger: CloseTrigger, after: impl FnOnce() + 'static) {
        let Some(ticket) = self.state.borrow_mut().request_close(trigger) else {
            return;
        };
        self.redraw.force_update();
        let state = self.state.clone();
        let redraw = self.redraw.clone();
        *self.timer.borrow_mut() = Some(Timeout::new(ticket.delay_ms, move || {
            if state.borrow_mut().finish_close(ticket) {
                redraw.force_update();
                after();
            }
        }));
    }

    /// Close callback suitable for [`AnimatedModal::on_close`].
    pub(crate) fn close_callback(&self) -> Callback<CloseTrigger> {
        let handle = self.clone();
        Callback::from(move |trigger| handle.close(trigger))
    }
}

#[hook]
pub(crate) fn use_modal(animation_ms: u32) -> ModalHandle {
    let state = use_mut_ref(|| ModalState::new(animation_ms));
    let timer = use_mut_ref(|| None as Option<Timeout>);
    let redraw = use_force_update();
    ModalHandle {
        state,
        timer,
        redraw,
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct AnimatedModalProps {
    pub(crate) state: ModalState,
    #[prop_or_default]
    pub(crate) id: Option<AttrValue>,
    #[prop_or_default]
    pub(crate) class: Classes,
    #[prop_or_default]
    pub(crate) content_class: Classes,
    #[prop_or_default]
    pub(crate) title: Option<AttrValue>,
    /// Render the corner close control.
    #[prop_or(true)]
    pub(crate) closable: bool,
    #[prop_or_default]
    pub(crate) children: Children,
    #[prop_or_default]
    pub(crate) on_close: Callback<CloseTrigger>,
}

#[function_component(AnimatedModal)]
pub(crate) fn animated_modal(props: &AnimatedModalProps) -> Html {
    let container = use_node_ref();
    let state = props.state;

    {
        let on_close = props.on_close.clone();
        use_effect_with_deps(
            move |phase: &ModalPhase| {
                let listener = (*phase == ModalPhase::Visible).then(|| {
                    EventListener::new(&gloo::utils::document(), "keydown", move |event| {
                        let key = event
                            .dyn_ref::<web_sys::KeyboardEvent>()
                            .map(web_sys::KeyboardEvent::key);
                        if let Some(trigger) =
                            key.and_then(|key| state.close_trigger_for_key(&key))
                        {
                            on_close.emit(trigger);
                        }
                    })
                });
                move || drop(listener)
            },
            state.phase(),
        );
    }

    let on_backdrop = {
        let container = container.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |event: MouseEvent| {
            let target = event.target_dyn_into::<web_sys::Element>();
            let own = container.cast::<web_sys::Element>();
            if target.is_some() && target == own {
                on_close.emit(CloseTrigger::Backdrop);
            }
        })
    };
    let on_close_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(CloseTrigger::CloseControl))
    };

    html! {
        <div
            id={props.id.clone()}
            ref={container}
            class={classes!("modal", state.container_classes().to_vec(), props.class.clone())}
            style={state.display_style()}
            role="dialog"
            aria-modal="true"
            onclick={on_backdrop}
        >
            <div class={classes!("modal-content", state.content_classes().to_vec(), props.content_class.clone())}>
                {if props.closable {
                    html! { <span class="close" onclick={on_close_click}>{"×"}</span> }
                } else {
                    html! {}
                }}
                {props.title.clone().map(|title| html! { <h2>{title}</h2> }).unwrap_or_default()}
                { for props.children.iter() }
            </div>
        </div>
    }
}
