//! Static documents served next to the page: catalog, popup config, update log,
//! runtime config.

use crate::core::catalog::{CatalogItem, parse_catalog};
use crate::core::config::{AppConfig, RUNTIME_CONFIG_PATH};
use crate::core::popup::PopupConfig;
use anyhow::{Context, Result, bail};
use gloo_net::http::Request;

/// Fetch a document as text, failing on non-2xx responses.
pub(crate) async fn fetch_text(path: &str) -> Result<String> {
    let response = Request::get(path)
        .send()
        .await
        .with_context(|| format!("request for {path} failed"))?;
    if !response.ok() {
        bail!("{path} returned HTTP {}", response.status());
    }
    response
        .text()
        .await
        .with_context(|| format!("reading {path} failed"))
}

/// Load and parse the catalog dataset.
pub(crate) async fn load_catalog(config: &AppConfig) -> Result<Vec<CatalogItem>> {
    let raw = fetch_text(&config.catalog_path).await?;
    parse_catalog(&raw).context("catalog dataset is malformed")
}

/// Load the popup configuration; any failure means "no popup".
pub(crate) async fn load_popup_config(config: &AppConfig) -> Option<PopupConfig> {
    match fetch_text(&config.popup_config_path).await {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(popup) => Some(popup),
            Err(err) => {
                tracing::warn!(error = %err, "popup config is malformed");
                None
            }
        },
        Err(err) => {
            tracing::debug!(error = %err, "popup config unavailable");
            None
        }
    }
}

/// Load the markdown update log.
pub(crate) async fn load_changelog(config: &AppConfig) -> Result<String> {
    fetch_text(&config.changelog_path).await
}

/// Resolve configuration: build-time defaults patched by the optional runtime document.
///
/// A missing document keeps the defaults; an invalid one is logged and ignored.
pub(crate) async fn load_config() -> AppConfig {
    let defaults = AppConfig::default();
    let raw = match fetch_text(RUNTIME_CONFIG_PATH).await {
        Ok(raw) => raw,
        Err(err) => {
            tracing::debug!(error = %err, "runtime config not found; using build defaults");
            return defaults;
        }
    };
    match defaults.with_patch_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = ?err, "runtime config rejected; using build defaults");
            defaults
        }
    }
}
