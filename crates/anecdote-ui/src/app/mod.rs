//! Root component and boot sequence.
//!
//! # Design
//! - Configuration is resolved before the first render and handed to the root as props.
//! - The root owns the session wiring: the backend's auth listener drives the completion
//!   store's medium switch and the one-time login sync.
//! - The filtered list and its counters are memoised together on (catalog, filters,
//!   completion); other store changes (dropdowns, auth flags) never re-run the filter.

use crate::components::auth::AuthPanel;
use crate::components::catalog::CatalogView;
use crate::components::changelog::ChangelogModal;
use crate::components::data_tools::DataTools;
use crate::components::dialogs::{FontLicenseModal, MoreOption, MoreOptionsModal};
use crate::components::modal::use_modal;
use crate::components::popup::NoticePopup;
use crate::components::scroll_top::ScrollTopButton;
use crate::components::toolbar::FilterToolbar;
use crate::core::catalog::{CatalogItem, versions};
use crate::core::completion::CompletionMap;
use crate::core::config::AppConfig;
use crate::core::filter::{FilterCriteria, FilteredView};
use crate::core::modal::CloseTrigger;
use crate::core::popup::PopupConfig;
use crate::core::session::{Session, SessionTransition, SessionUser};
use crate::core::store::{
    AppStore, CatalogStatus, apply_session, clear_filters, set_catalog, set_catalog_failed,
    set_completion,
};
use crate::core::ui::{FontPreference, LayoutMode, layout_for_width};
use crate::services::documents::{load_catalog, load_config, load_popup_config};
use crate::services::storage::BrowserStorage;
pub(crate) use context::AppCtx;
use gloo::events::EventListener;
use gloo::utils::{document, window};
use std::rc::Rc;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

mod context;
mod telemetry;

#[derive(Properties, PartialEq)]
pub(crate) struct AnecdoteAppProps {
    pub(crate) config: Rc<AppConfig>,
}

#[function_component(AnecdoteApp)]
pub(crate) fn anecdote_app(props: &AnecdoteAppProps) -> Html {
    let ctx = {
        let config = props.config.clone();
        use_memo(move |_| AppCtx::new(config), ())
    };
    let dispatch = Dispatch::<AppStore>::new();
    let breakpoint = props.config.mobile_breakpoint;
    let layout = use_state_eq(|| current_layout(breakpoint));
    let popup = use_state(|| None as Option<Rc<PopupConfig>>);
    let more_options = use_modal(props.config.modal_animation_ms);
    let changelog = use_modal(props.config.modal_animation_ms);
    let font_license = use_modal(props.config.modal_animation_ms);

    let items = use_selector(|store: &AppStore| store.catalog.items.clone());
    let status = use_selector(|store: &AppStore| store.catalog.status.clone());
    let filters = use_selector(|store: &AppStore| store.filters.clone());
    let completion = use_selector(|store: &AppStore| store.completion.clone());
    let filter_resets = use_selector(|store: &AppStore| store.filter_resets);
    let version_list = use_memo(|items: &Rc<Vec<CatalogItem>>| versions(items), (*items).clone());
    let view = use_memo(
        |(items, filters, completion): &(Rc<Vec<CatalogItem>>, FilterCriteria, CompletionMap)| {
            FilteredView::build(items, filters, completion)
        },
        ((*items).clone(), (*filters).clone(), (*completion).clone()),
    );

    {
        let ctx = (*ctx).clone();
        let dispatch = dispatch.clone();
        let popup = popup.clone();
        use_effect_with_deps(
            move |_| {
                apply_font_preference(BrowserStorage.font_preference());
                boot(ctx, dispatch, popup);
                || ()
            },
            (),
        );
    }
    {
        let layout = layout.clone();
        use_effect_with_deps(
            move |breakpoint: &u32| {
                let breakpoint = *breakpoint;
                let handler = EventListener::new(&window(), "resize", move |_event| {
                    layout.set(current_layout(breakpoint));
                });
                move || drop(handler)
            },
            breakpoint,
        );
    }
    {
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                let handler = EventListener::new(&document(), "click", move |_event| {
                    dispatch.reduce_mut(|store| store.dropdowns = store.dropdowns.clicked(None));
                });
                move || drop(handler)
            },
            (),
        );
    }

    let on_toggle = {
        let ctx = (*ctx).clone();
        let dispatch = dispatch.clone();
        Callback::from(move |(id, done): (String, bool)| {
            dispatch.reduce_mut(|store| store.completion.set(id.clone(), done));
            let ctx = ctx.clone();
            let dispatch = dispatch.clone();
            yew::platform::spawn_local(async move {
                match ctx.completion.set(&id, done).await {
                    Ok(map) => dispatch.reduce_mut(|store| set_completion(store, map)),
                    Err(err) => tracing::warn!(error = ?err, id = %id, "completion write failed"),
                }
            });
        })
    };
    let on_search = {
        let dispatch = dispatch.clone();
        Callback::from(move |term: String| dispatch.reduce_mut(|store| store.filters.search = term))
    };
    let on_region = {
        let dispatch = dispatch.clone();
        Callback::from(move |region: String| dispatch.reduce_mut(|store| store.filters.region = region))
    };
    let on_version = {
        let dispatch = dispatch.clone();
        Callback::from(move |version: String| {
            dispatch.reduce_mut(|store| store.filters.version = version);
        })
    };
    let on_only_incomplete = {
        let dispatch = dispatch.clone();
        Callback::from(move |only: bool| dispatch.reduce_mut(|store| store.filters.only_incomplete = only))
    };
    let on_clear = {
        let dispatch = dispatch.clone();
        Callback::from(move |()| dispatch.reduce_mut(clear_filters))
    };

    let open_more = {
        let more_options = more_options.clone();
        Callback::from(move |_: MouseEvent| more_options.open())
    };
    let on_more_pick = {
        let more_options = more_options.clone();
        let changelog = changelog.clone();
        let font_license = font_license.clone();
        let config = props.config.clone();
        Callback::from(move |option: MoreOption| match option {
            MoreOption::UpdateLog => {
                let changelog = changelog.clone();
                more_options.close_then(CloseTrigger::CloseControl, move || changelog.open());
            }
            MoreOption::FontLicense => {
                let font_license = font_license.clone();
                more_options.close_then(CloseTrigger::CloseControl, move || font_license.open());
            }
            MoreOption::Feedback => open_url(&config.feedback_url, "_blank"),
            MoreOption::NewVersion => open_url(&config.new_version_page, "_self"),
        })
    };
    let on_font_choice = {
        let font_license = font_license.clone();
        Callback::from(move |preference: FontPreference| {
            BrowserStorage.persist_font_preference(preference);
            font_license.close_then(CloseTrigger::CloseControl, reload_page);
        })
    };

    let body = match &*status {
        CatalogStatus::Loading => html! { <p class="loading">{"数据加载中..."}</p> },
        CatalogStatus::Failed(_) => html! { <p class="error">{"数据加载失败，请刷新页面重试。"}</p> },
        CatalogStatus::Ready => html! {
            <CatalogView
                layout={*layout}
                items={view.items.clone()}
                completion={(*completion).clone()}
                on_toggle={on_toggle}
            />
        },
    };

    html! {
        <ContextProvider<AppCtx> context={(*ctx).clone()}>
            <div class="container">
                <header class="page-header">
                    <h1>{"原神逸闻完成度追踪"}</h1>
                    <button id="more-options-btn" onclick={open_more}>{"更多选项"}</button>
                </header>
                <AuthPanel />
                <FilterToolbar
                    criteria={(*filters).clone()}
                    versions={(*version_list).clone()}
                    counts={view.counts}
                    resets={*filter_resets}
                    debounce_ms={props.config.search_debounce_ms}
                    {on_search}
                    {on_region}
                    {on_version}
                    {on_only_incomplete}
                    {on_clear}
                />
                <DataTools />
                <div class="table-container">{body}</div>
                <ScrollTopButton threshold={props.config.scroll_top_threshold} />
            </div>
            {(*popup).clone().map(|config| html! { <NoticePopup {config} /> }).unwrap_or_default()}
            <MoreOptionsModal
                state={more_options.snapshot()}
                on_close={more_options.close_callback()}
                on_pick={on_more_pick}
            />
            <ChangelogModal state={changelog.snapshot()} on_close={changelog.close_callback()} />
            <FontLicenseModal
                state={font_license.snapshot()}
                on_close={font_license.close_callback()}
                on_choose={on_font_choice}
            />
        </ContextProvider<AppCtx>>
    }
}

/// Kick off the independent boot loads: catalog, session restore, popup config.
fn boot(ctx: AppCtx, dispatch: Dispatch<AppStore>, popup: UseStateHandle<Option<Rc<PopupConfig>>>) {
    {
        let backend = ctx.backend.clone();
        let ctx = ctx.clone();
        let session_dispatch = dispatch.clone();
        backend.on_auth_change(Callback::from(move |user| {
            handle_session(&ctx, &session_dispatch, user);
        }));
    }
    {
        let ctx = ctx.clone();
        let dispatch = dispatch.clone();
        yew::platform::spawn_local(async move {
            match load_catalog(&ctx.config).await {
                Ok(items) => {
                    tracing::debug!(items = items.len(), "catalog loaded");
                    dispatch.reduce_mut(|store| set_catalog(store, items));
                }
                Err(err) => {
                    gloo::console::error!("catalog load failed", format!("{err:#}"));
                    dispatch.reduce_mut(|store| set_catalog_failed(store, format!("{err:#}")));
                }
            }
        });
    }
    {
        let ctx = ctx.clone();
        yew::platform::spawn_local(async move {
            if ctx.backend.restore_session().await.is_none() {
                refresh_completion(&ctx, &dispatch).await;
            }
        });
    }
    yew::platform::spawn_local(async move {
        popup.set(load_popup_config(&ctx.config).await.map(Rc::new));
    });
}

/// React to an auth change: switch the completion medium and run the side effects
/// the transition calls for.
fn handle_session(ctx: &AppCtx, dispatch: &Dispatch<AppStore>, user: Option<SessionUser>) {
    let next = Session::from_user(user.clone());
    let mut transition = SessionTransition::Unchanged;
    dispatch.reduce_mut(|store| transition = apply_session(store, next));
    match transition {
        SessionTransition::Unchanged => {}
        SessionTransition::SignedOut => {
            ctx.completion.set_user(None);
            ctx.completion.clear_local();
            let ctx = ctx.clone();
            let dispatch = dispatch.clone();
            yew::platform::spawn_local(async move { refresh_completion(&ctx, &dispatch).await });
        }
        SessionTransition::SignedIn(_) | SessionTransition::SwitchedUser(_) => {
            ctx.completion.set_user(user);
            let ctx = ctx.clone();
            let dispatch = dispatch.clone();
            yew::platform::spawn_local(async move {
                if let Err(err) = ctx.completion.sync_on_login().await {
                    tracing::warn!(error = ?err, "login sync failed; keeping local data");
                }
                refresh_completion(&ctx, &dispatch).await;
            });
        }
    }
}

async fn refresh_completion(ctx: &AppCtx, dispatch: &Dispatch<AppStore>) {
    let map = ctx.completion.get().await;
    dispatch.reduce_mut(|store| set_completion(store, map));
}

fn current_layout(breakpoint: u32) -> LayoutMode {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let width = window()
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .map_or(1280, |w| w.max(0.0) as u32);
    layout_for_width(width, breakpoint)
}

fn apply_font_preference(preference: FontPreference) {
    let Some(css) = preference.override_css() else {
        return;
    };
    let Some(head) = document().head() else {
        gloo::console::error!("font override skipped: document has no head");
        return;
    };
    match document().create_element("style") {
        Ok(style) => {
            style.set_text_content(Some(css));
            if let Err(err) = head.append_child(&style) {
                gloo::console::error!("font override injection failed", err);
            }
        }
        Err(err) => gloo::console::error!("font override element failed", err),
    }
}

fn open_url(url: &str, target: &str) {
    if let Err(err) = window().open_with_url_and_target(url, target) {
        gloo::console::error!("window open failed", url.to_string(), err);
    }
}

fn reload_page() {
    if let Err(err) = window().location().reload() {
        gloo::console::error!("page reload failed", err);
    }
}

/// Entrypoint invoked by Trunk for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Err(err) = telemetry::init_logging() {
        gloo::console::warn!(format!("{err:#}"));
    }
    yew::platform::spawn_local(async {
        let config = Rc::new(load_config().await);
        let props = AnecdoteAppProps { config };
        if let Some(root) = document().get_element_by_id("root") {
            yew::Renderer::<AnecdoteApp>::with_root_and_props(root, props).render();
        } else {
            yew::Renderer::<AnecdoteApp>::with_props(props).render();
        }
    });
}
