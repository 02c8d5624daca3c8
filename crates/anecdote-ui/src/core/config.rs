//! Application configuration: compile-time defaults plus an optional runtime patch.
//!
//! # Design
//! - Defaults come from `option_env!` so a static build can target a backend without a
//!   config fetch.
//! - A runtime JSON document may override any field; absent fields keep their value.
//! - `validate` runs after every merge; an invalid patch is rejected as a whole.

use crate::core::error::ConfigError;
use serde::Deserialize;

/// Environment variable (read at build time) for the backend base URL.
pub const BACKEND_URL_ENV: &str = "ANECDOTE_BACKEND_URL";
/// Environment variable (read at build time) for the backend anonymous key.
pub const BACKEND_ANON_KEY_ENV: &str = "ANECDOTE_BACKEND_ANON_KEY";
/// Path of the optional runtime configuration document.
pub const RUNTIME_CONFIG_PATH: &str = "config/app-config.json";

/// Resolved application configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Hosted backend base URL (no trailing slash required).
    pub backend_url: String,
    /// Publishable anonymous API key for the backend.
    pub backend_anon_key: String,
    /// Table holding one completion record per user.
    pub records_table: String,
    /// Catalog dataset document.
    pub catalog_path: String,
    /// Popup configuration document.
    pub popup_config_path: String,
    /// Markdown update log.
    pub changelog_path: String,
    /// Completion read cache window in milliseconds.
    pub cache_ttl_ms: u64,
    /// Search input debounce in milliseconds.
    pub search_debounce_ms: u32,
    /// Widths at or below this render the card layout.
    pub mobile_breakpoint: u32,
    /// Modal close animation length in milliseconds.
    pub modal_animation_ms: u32,
    /// Scroll offset after which the scroll-to-top button appears.
    pub scroll_top_threshold: u32,
    /// External feedback form.
    pub feedback_url: String,
    /// Page for the redesigned tracker.
    pub new_version_page: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: option_env!("ANECDOTE_BACKEND_URL")
                .unwrap_or("http://localhost:54321")
                .to_string(),
            backend_anon_key: option_env!("ANECDOTE_BACKEND_ANON_KEY")
                .unwrap_or_default()
                .to_string(),
            records_table: "completed_tasks".to_string(),
            catalog_path: "data/data-zh-cn.json".to_string(),
            popup_config_path: "data/popup-config.json".to_string(),
            changelog_path: "data/update-log.md".to_string(),
            cache_ttl_ms: 1_000,
            search_debounce_ms: 300,
            mobile_breakpoint: 768,
            modal_animation_ms: crate::core::modal::DEFAULT_ANIMATION_MS,
            scroll_top_threshold: 200,
            feedback_url: "https://wj.qq.com/s2/24219207/e16c/".to_string(),
            new_version_page: "new-version.html".to_string(),
        }
    }
}

/// Runtime override document; every field is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigPatch {
    backend_url: Option<String>,
    backend_anon_key: Option<String>,
    records_table: Option<String>,
    catalog_path: Option<String>,
    popup_config_path: Option<String>,
    changelog_path: Option<String>,
    cache_ttl_ms: Option<u64>,
    search_debounce_ms: Option<u32>,
    mobile_breakpoint: Option<u32>,
    modal_animation_ms: Option<u32>,
    scroll_top_threshold: Option<u32>,
    feedback_url: Option<String>,
    new_version_page: Option<String>,
}

impl AppConfig {
    /// Apply a runtime patch and validate the result.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidField`] when the merged config fails validation.
    pub fn with_patch(&self, patch: ConfigPatch) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field { next.$field = value; })*
            };
        }
        apply!(
            backend_url,
            backend_anon_key,
            records_table,
            catalog_path,
            popup_config_path,
            changelog_path,
            cache_ttl_ms,
            search_debounce_ms,
            mobile_breakpoint,
            modal_animation_ms,
            scroll_top_threshold,
            feedback_url,
            new_version_page,
        );
        next.validate()?;
        Ok(next)
    }

    /// Parse and apply a runtime patch document.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidField`] for unparsable documents or invalid values.
    pub fn with_patch_json(&self, raw: &str) -> Result<Self, ConfigError> {
        let patch: ConfigPatch =
            serde_json::from_str(raw).map_err(|err| ConfigError::InvalidField {
                field: "document",
                reason: "unparsable runtime configuration",
                value: Some(err.to_string()),
            })?;
        self.with_patch(patch)
    }

    /// Check field invariants.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidField`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("backendUrl", &self.backend_url),
            ("recordsTable", &self.records_table),
            ("catalogPath", &self.catalog_path),
            ("popupConfigPath", &self.popup_config_path),
            ("changelogPath", &self.changelog_path),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidField {
                    field,
                    reason: "must not be empty",
                    value: None,
                });
            }
        }
        if self.mobile_breakpoint == 0 {
            return Err(invalid("mobileBreakpoint", "must be positive", self.mobile_breakpoint));
        }
        if self.cache_ttl_ms > 60_000 {
            return Err(invalid("cacheTtlMs", "must not exceed one minute", self.cache_ttl_ms));
        }
        Ok(())
    }

    /// Backend URL without a trailing slash.
    #[must_use]
    pub fn backend_base(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }
}

fn invalid(field: &'static str, reason: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidField {
        field,
        reason,
        value: Some(value.to_string()),
    }
}
