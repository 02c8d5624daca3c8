//! Filter toolbar: debounced search, region/version dropdowns, incomplete toggle,
//! clear button, and the view counters.

use crate::components::dropdown::CustomDropdown;
use crate::core::catalog::Region;
use crate::core::dropdown::SelectOption;
use crate::core::filter::{ALL, FilterCriteria, ViewCounts};
use gloo_timers::callback::Timeout;
use yew::prelude::*;

const REGION_DROPDOWN: &str = "region-filter";
const VERSION_DROPDOWN: &str = "version-filter";

#[derive(Properties, PartialEq)]
pub(crate) struct SearchInputProps {
    #[prop_or_default]
    pub(crate) value: AttrValue,
    #[prop_or_default]
    pub(crate) placeholder: Option<AttrValue>,
    #[prop_or(300)]
    pub(crate) debounce_ms: u32,
    /// Reset generation; a change drops any pending edit and shows `value` again.
    #[prop_or_default]
    pub(crate) resets: u64,
    #[prop_or_default]
    pub(crate) on_search: Callback<String>,
}

/// Search box keeping local text for immediate feedback and emitting debounced values.
#[function_component(SearchInput)]
pub(crate) fn search_input(props: &SearchInputProps) -> Html {
    let value_state = use_state(|| props.value.to_string());
    let debounce = props.debounce_ms;
    let timer = use_mut_ref(|| None as Option<Timeout>);

    {
        let value_state = value_state.clone();
        let timer = timer.clone();
        use_effect_with_deps(
            move |incoming: &AttrValue| {
                let next = incoming.to_string();
                if *value_state != next {
                    timer.borrow_mut().take();
                    value_state.set(next);
                }
                || ()
            },
            props.value.clone(),
        );
    }
    {
        let value_state = value_state.clone();
        let timer = timer.clone();
        let value = props.value.to_string();
        use_effect_with_deps(
            move |_| {
                timer.borrow_mut().take();
                value_state.set(value);
                || ()
            },
            props.resets,
        );
    }

    let oninput = {
        let on_search = props.on_search.clone();
        let value_state = value_state.clone();
        Callback::from(move |event: InputEvent| {
            let Some(input) = event.target_dyn_into::<web_sys::HtmlInputElement>() else {
                return;
            };
            let next = input.value();
            value_state.set(next.clone());
            if debounce == 0 {
                on_search.emit(next);
                return;
            }
            let on_search = on_search.clone();
            *timer.borrow_mut() = Some(Timeout::new(debounce, move || on_search.emit(next)));
        })
    };

    html! {
        <input
            id="search-input"
            type="search"
            placeholder={props.placeholder.clone()}
            value={AttrValue::from((*value_state).clone())}
            {oninput}
        />
    }
}

/// Region selector options in classification order.
fn region_options() -> Vec<SelectOption> {
    std::iter::once(SelectOption::new(ALL, "全部地区"))
        .chain(
            Region::ALL
                .iter()
                .map(|region| SelectOption::new(region.marker(), region.marker())),
        )
        .collect()
}

/// Version selector options for the loaded catalog.
fn version_options(versions: &[String]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new(ALL, "全部版本"))
        .chain(
            versions
                .iter()
                .map(|version| SelectOption::new(version.clone(), version.clone())),
        )
        .collect()
}

#[derive(Properties, PartialEq)]
pub(crate) struct FilterToolbarProps {
    pub(crate) criteria: FilterCriteria,
    pub(crate) versions: Vec<String>,
    pub(crate) counts: ViewCounts,
    pub(crate) resets: u64,
    pub(crate) debounce_ms: u32,
    pub(crate) on_search: Callback<String>,
    pub(crate) on_region: Callback<String>,
    pub(crate) on_version: Callback<String>,
    pub(crate) on_only_incomplete: Callback<bool>,
    pub(crate) on_clear: Callback<()>,
}

#[function_component(FilterToolbar)]
pub(crate) fn filter_toolbar(props: &FilterToolbarProps) -> Html {
    let regions = use_memo(|_| region_options(), ());
    let versions = {
        let versions = props.versions.clone();
        use_memo(|versions| version_options(versions), versions)
    };
    let on_incomplete = {
        let on_only_incomplete = props.on_only_incomplete.clone();
        Callback::from(move |event: Event| {
            if let Some(input) = event.target_dyn_into::<web_sys::HtmlInputElement>() {
                on_only_incomplete.emit(input.checked());
            }
        })
    };
    let on_clear = {
        let on_clear = props.on_clear.clone();
        Callback::from(move |_: MouseEvent| on_clear.emit(()))
    };

    html! {
        <div class="filter-container">
            <SearchInput
                value={AttrValue::from(props.criteria.search.clone())}
                placeholder={AttrValue::from("搜索角色、旅行名称、地点或描述")}
                debounce_ms={props.debounce_ms}
                resets={props.resets}
                on_search={props.on_search.clone()}
            />
            <CustomDropdown
                id={REGION_DROPDOWN}
                options={(*regions).clone()}
                value={AttrValue::from(props.criteria.region.clone())}
                on_change={props.on_region.clone()}
            />
            <CustomDropdown
                id={VERSION_DROPDOWN}
                options={(*versions).clone()}
                value={AttrValue::from(props.criteria.version.clone())}
                on_change={props.on_version.clone()}
            />
            <label class="checkbox-label">
                <input
                    id="show-completed"
                    type="checkbox"
                    checked={props.criteria.only_incomplete}
                    onchange={on_incomplete}
                />
                {"只显示未完成"}
            </label>
            <button id="clear-filter" onclick={on_clear}>{"清除筛选"}</button>
            <div class="task-counts">
                <span>{"总数: "}<span id="total-count">{props.counts.total}</span></span>
                <span>{"当前显示: "}<span id="current-count">{props.counts.visible}</span></span>
                <span>{"未完成: "}<span id="incomplete-count">{props.counts.incomplete}</span></span>
            </div>
        </div>
    }
}
