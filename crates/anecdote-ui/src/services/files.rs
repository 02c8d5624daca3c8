//! Export download and import file reading.

use crate::core::completion::{CompletionMap, export_file_name};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use gloo::file::{Blob, ObjectUrl};
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

/// Today's UTC date, matching the ISO date prefix used in export names.
fn today_utc() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        i32::try_from(now.get_utc_full_year()).ok()?,
        now.get_utc_month() + 1,
        now.get_utc_date(),
    )
}

/// Serialize `map` and hand it to the browser as a JSON download.
pub(crate) fn download_export(map: &CompletionMap) -> Result<()> {
    let body = map.to_export_json().context("export serialization failed")?;
    let date = today_utc().ok_or_else(|| anyhow!("system date out of range"))?;
    let url = ObjectUrl::from(Blob::new_with_options(body.as_str(), Some("application/json")));

    let document = gloo::utils::document();
    let link: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|err| anyhow!("create anchor failed: {err:?}"))?
        .dyn_into()
        .map_err(|_| anyhow!("anchor element has unexpected type"))?;
    link.set_href(&url);
    link.set_download(&export_file_name(date));
    let body_el = gloo::utils::body();
    body_el
        .append_child(&link)
        .map_err(|err| anyhow!("attach anchor failed: {err:?}"))?;
    link.click();
    body_el
        .remove_child(&link)
        .map_err(|err| anyhow!("detach anchor failed: {err:?}"))?;
    // `url` is revoked when dropped here.
    Ok(())
}

/// Read a chosen import file as text.
pub(crate) async fn read_text(file: web_sys::File) -> Result<String> {
    let file = gloo::file::File::from(file);
    gloo::file::futures::read_as_text(&file)
        .await
        .map_err(|err| anyhow!("reading import file failed: {err}"))
}
