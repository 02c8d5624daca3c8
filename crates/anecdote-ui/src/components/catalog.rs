//! Catalog list: desktop table and mobile cards.

use crate::core::catalog::CatalogItem;
use crate::core::completion::CompletionMap;
use crate::core::ui::LayoutMode;
use std::rc::Rc;
use yew::prelude::*;

const COMPLETED_CLASS: &str = "completed-task";

/// Checkbox toggle: (item id, new done state).
pub(crate) type ToggleCallback = Callback<(String, bool)>;

#[derive(Properties, PartialEq)]
pub(crate) struct CatalogViewProps {
    pub(crate) layout: LayoutMode,
    pub(crate) items: Rc<Vec<CatalogItem>>,
    pub(crate) completion: CompletionMap,
    pub(crate) on_toggle: ToggleCallback,
}

#[function_component(CatalogView)]
pub(crate) fn catalog_view(props: &CatalogViewProps) -> Html {
    match props.layout {
        LayoutMode::Table => html! {
            <table class="anecdote-table">
                <thead>
                    <tr>
                        <th>{"完成"}</th>
                        <th>{"ID"}</th>
                        <th>{"角色"}</th>
                        <th>{"版本"}</th>
                        <th>{"旅行名称"}</th>
                        <th>{"地点"}</th>
                        <th>{"隐藏触发条件"}</th>
                        <th>{"额外出场角色"}</th>
                        <th>{"描述"}</th>
                    </tr>
                </thead>
                <tbody id="table-body">
                    {for props.items.iter().map(|item| table_row(item, &props.completion, &props.on_toggle))}
                </tbody>
            </table>
        },
        LayoutMode::Card => html! {
            <div class="card-container">
                {for props.items.iter().map(|item| card(item, &props.completion, &props.on_toggle))}
            </div>
        },
    }
}

fn task_checkbox(id: &str, done: bool, on_toggle: &ToggleCallback) -> Html {
    let on_change = {
        let on_toggle = on_toggle.clone();
        let id = id.to_string();
        Callback::from(move |event: Event| {
            if let Some(input) = event.target_dyn_into::<web_sys::HtmlInputElement>() {
                on_toggle.emit((id.clone(), input.checked()));
            }
        })
    };
    html! {
        <input type="checkbox" class="task-checkbox" checked={done} onchange={on_change} />
    }
}

fn table_row(item: &CatalogItem, completion: &CompletionMap, on_toggle: &ToggleCallback) -> Html {
    let done = completion.is_done(&item.id);
    let region = item.region().map(|region| region.row_class());
    html! {
        <tr key={item.id.clone()} class={classes!(region, done.then_some(COMPLETED_CLASS))}>
            <td>{task_checkbox(&item.id, done, on_toggle)}</td>
            <td>{item.id.clone()}</td>
            <td>{item.character.clone()}</td>
            <td>{item.version.clone()}</td>
            <td>
                <span class={classes!(item.is_hidden.then_some("hidden-travel"))}>
                    {item.travel_name.clone()}
                </span>
            </td>
            <td>{item.location.clone()}</td>
            <td>{item.hidden_condition_label().to_string()}</td>
            <td>{item.extra_character_label().to_string()}</td>
            <td>{item.description.clone()}</td>
        </tr>
    }
}

fn card(item: &CatalogItem, completion: &CompletionMap, on_toggle: &ToggleCallback) -> Html {
    let done = completion.is_done(&item.id);
    let region = item.region().map(|region| region.card_class());
    let field = |label: &'static str, value: &str| {
        html! { <p><strong>{label}</strong>{" "}{value.to_string()}</p> }
    };
    html! {
        <div key={item.id.clone()} class={classes!("character-card", region, done.then_some(COMPLETED_CLASS))}>
            <div class="card-header">
                {task_checkbox(&item.id, done, on_toggle)}
                <h3 class={classes!(item.is_hidden.then_some("hidden-travel"))}>
                    {item.travel_name.clone()}
                </h3>
            </div>
            <div class="card-body">
                {field("ID:", &item.id)}
                {field("角色:", &item.character)}
                {field("版本:", &item.version)}
                {field("地点:", &item.location)}
                {field("隐藏触发条件:", item.hidden_condition_label())}
                {field("额外出场角色:", item.extra_character_label())}
                {field("描述:", &item.description)}
            </div>
        </div>
    }
}
