//! Styled dropdown layered over a hidden native `<select>`.
//!
//! # Design
//! - The native control stays the source of truth; the widget writes the chosen value
//!   back and dispatches a bubbling `change` so every listener sees it.
//! - Open/closed state is shared through the app store so only one instance is open.

use crate::core::dropdown::{DropdownId, DropdownModel, SelectOption};
use crate::core::store::AppStore;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[derive(Properties, PartialEq)]
pub(crate) struct CustomDropdownProps {
    pub(crate) id: DropdownId,
    pub(crate) options: Vec<SelectOption>,
    /// Value the native control should hold; changes trigger a resync.
    pub(crate) value: AttrValue,
    #[prop_or_default]
    pub(crate) on_change: Callback<String>,
}

#[function_component(CustomDropdown)]
pub(crate) fn custom_dropdown(props: &CustomDropdownProps) -> Html {
    let select_ref = use_node_ref();
    let model = use_state(|| DropdownModel::with_value(props.options.clone(), &props.value));
    let id = props.id;
    let open = use_selector(move |store: &AppStore| store.dropdowns.is_open(id));
    let dispatch = Dispatch::<AppStore>::new();

    {
        let model = model.clone();
        let select_ref = select_ref.clone();
        use_effect_with_deps(
            move |(options, value): &(Vec<SelectOption>, AttrValue)| {
                let next = DropdownModel::with_value(options.clone(), value);
                if let Some(select) = select_ref.cast::<web_sys::HtmlSelectElement>() {
                    select.set_value(value);
                }
                if *model != next {
                    model.set(next);
                }
                || ()
            },
            (props.options.clone(), props.value.clone()),
        );
    }

    let on_native_change = {
        let on_change = props.on_change.clone();
        let model = model.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<web_sys::HtmlSelectElement>() {
                let mut next = (*model).clone();
                next.resync(usize::try_from(select.selected_index()).unwrap_or(0));
                model.set(next);
                on_change.emit(select.value());
            }
        })
    };

    let on_toggle = {
        let dispatch = dispatch.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            dispatch.reduce_mut(|store| store.dropdowns = store.dropdowns.toggled(id));
        })
    };

    let on_pick = {
        let model = model.clone();
        let select_ref = select_ref.clone();
        Callback::from(move |index: usize| {
            let mut next = (*model).clone();
            let Some(value) = next.choose(index) else {
                return;
            };
            model.set(next);
            dispatch.reduce_mut(|store| store.dropdowns = store.dropdowns.closed(id));
            if let Some(select) = select_ref.cast::<web_sys::HtmlSelectElement>() {
                select.set_value(&value);
                notify_change(&select);
            }
        })
    };

    let selected = model.selected_index();
    html! {
        <>
            <select
                id={id}
                ref={select_ref}
                style="display: none;"
                onchange={on_native_change}
            >
                {for model.options().iter().enumerate().map(|(index, option)| html! {
                    <option value={option.value.clone()} selected={index == selected}>
                        {option.label.clone()}
                    </option>
                })}
            </select>
            <div class="custom-select" onclick={|event: MouseEvent| event.stop_propagation()}>
                <div
                    class={classes!("select-selected", open.then_some("select-arrow-active"))}
                    data-value={model.selected().map(|option| option.value.clone())}
                    onclick={on_toggle}
                >
                    {model.label().to_string()}
                </div>
                <div class={classes!("select-items", if *open { "select-show" } else { "select-hide" })}>
                    {for model.options().iter().enumerate().map(|(index, option)| {
                        let on_pick = on_pick.clone();
                        html! {
                            <div
                                class={classes!((index == selected).then_some("same-as-selected"))}
                                data-value={option.value.clone()}
                                onclick={Callback::from(move |_: MouseEvent| on_pick.emit(index))}
                            >
                                {option.label.clone()}
                            </div>
                        }
                    })}
                </div>
            </div>
        </>
    }
}

/// Fire a bubbling, cancelable `change` event on the native control.
fn notify_change(select: &web_sys::HtmlSelectElement) {
    let init = web_sys::EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    match web_sys::Event::new_with_event_init_dict("change", &init) {
        Ok(event) => {
            if let Err(err) = select.dispatch_event(&event) {
                gloo::console::error!("dropdown change dispatch failed", err);
            }
        }
        Err(err) => gloo::console::error!("dropdown change event failed", err),
    }
}
