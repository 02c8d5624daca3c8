//! Export / import of the completion map.

use crate::app::AppCtx;
use crate::core::completion::{ImportOutcome, import_alert, import_rejected_alert, parse_import};
use crate::core::store::{AppStore, set_completion};
use crate::services::files::{download_export, read_text};
use gloo::dialogs::alert;
use yew::prelude::*;
use yewdux::prelude::Dispatch;

#[function_component(DataTools)]
pub(crate) fn data_tools() -> Html {
    let ctx = use_context::<AppCtx>();

    let on_export = {
        let ctx = ctx.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(ctx) = ctx.clone() else {
                return;
            };
            yew::platform::spawn_local(async move {
                let map = ctx.completion.get().await;
                if let Err(err) = download_export(&map) {
                    gloo::console::error!("export failed", format!("{err:#}"));
                }
            });
        })
    };

    let on_import = Callback::from(move |event: Event| {
        let Some(input) = event.target_dyn_into::<web_sys::HtmlInputElement>() else {
            return;
        };
        let file = input.files().and_then(|files| files.get(0));
        input.set_value("");
        let (Some(file), Some(ctx)) = (file, ctx.clone()) else {
            return;
        };
        yew::platform::spawn_local(async move {
            let raw = match read_text(file).await {
                Ok(raw) => raw,
                Err(err) => {
                    gloo::console::error!("import read failed", format!("{err:#}"));
                    return;
                }
            };
            let map = match parse_import(&raw) {
                Ok(map) => map,
                Err(err) => {
                    tracing::warn!(error = %err, "import rejected");
                    alert(import_rejected_alert(&err));
                    return;
                }
            };
            let signed_in = ctx.completion.user().is_some();
            let result = ctx.completion.replace(&map).await;
            if let Err(err) = &result {
                tracing::warn!(error = ?err, "import write failed");
            }
            alert(&import_alert(&ImportOutcome::from_write(signed_in, &result)));
            let current = ctx.completion.get().await;
            Dispatch::<AppStore>::new().reduce_mut(|store| set_completion(store, current));
        });
    });

    html! {
        <div class="data-tools">
            <button id="export-data" onclick={on_export}>{"导出数据"}</button>
            <label class="import-label">
                {"导入数据"}
                <input id="import-data" type="file" accept=".json,application/json" onchange={on_import} />
            </label>
        </div>
    }
}
