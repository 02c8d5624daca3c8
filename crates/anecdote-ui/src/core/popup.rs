//! First-run notice popup configuration and gating.

use serde::Deserialize;

/// Local storage key set once the popup was dismissed.
pub const POPUP_CLOSED_KEY: &str = "prePopupClosed";
/// Local storage key holding the `time` of the dismissed popup.
pub const POPUP_TIME_KEY: &str = "prePopupTime";
/// Delay before the popup animates in, in milliseconds.
pub const POPUP_OPEN_DELAY_MS: u32 = 100;

/// Popup configuration document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupConfig {
    /// Master switch.
    #[serde(default)]
    pub show_popup: bool,
    /// Title; defaults to `通知`.
    #[serde(default)]
    pub title: Option<String>,
    /// Body markup.
    #[serde(default)]
    pub content: Option<String>,
    /// Version/time stamp; a new value re-shows the popup to users who dismissed it.
    #[serde(default)]
    pub time: Option<String>,
    /// Button label; defaults to `确定`.
    #[serde(default)]
    pub button_text: Option<String>,
    /// Close animation length in milliseconds.
    #[serde(default)]
    pub animation_duration: Option<u32>,
}

impl PopupConfig {
    /// Whether to show the popup given the persisted dismissal state.
    #[must_use]
    pub fn should_show(&self, dismissed: bool, dismissed_time: Option<&str>) -> bool {
        if !self.show_popup {
            return false;
        }
        let current = self.time.as_deref().unwrap_or("");
        !(dismissed && dismissed_time == Some(current))
    }

    /// Title with default.
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        non_empty(self.title.as_deref()).unwrap_or("通知")
    }

    /// Button label with default.
    #[must_use]
    pub fn button_or_default(&self) -> &str {
        non_empty(self.button_text.as_deref()).unwrap_or("确定")
    }

    /// Body markup: the time stamp (when present) followed by the content.
    #[must_use]
    pub fn body_html(&self) -> String {
        let mut body = String::new();
        if let Some(time) = non_empty(self.time.as_deref()) {
            body.push_str(time);
            body.push_str("<br><br>");
        }
        body.push_str(self.content.as_deref().unwrap_or(""));
        body
    }

    /// Close animation length with the modal default.
    #[must_use]
    pub fn animation_ms(&self) -> u32 {
        match self.animation_duration {
            Some(ms) if ms > 0 => ms,
            _ => crate::core::modal::DEFAULT_ANIMATION_MS,
        }
    }

    /// Value persisted under [`POPUP_TIME_KEY`] on dismissal.
    #[must_use]
    pub fn dismissal_time(&self) -> &str {
        self.time.as_deref().unwrap_or("")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> PopupConfig {
        serde_json::from_value(json!({
            "showPopup": true,
            "title": "公告",
            "content": "欢迎使用",
            "time": "2025-06-01",
            "buttonText": "知道了",
            "animationDuration": 500
        }))
        .unwrap()
    }

    #[test]
    fn gating_respects_time_stamp() {
        let config = config();
        assert!(config.should_show(false, None));
        assert!(!config.should_show(true, Some("2025-06-01")));
        assert!(config.should_show(true, Some("2025-05-01")));
        let off = PopupConfig {
            show_popup: false,
            ..config
        };
        assert!(!off.should_show(false, None));
    }

    #[test]
    fn body_prefixes_time() {
        let config = config();
        assert_eq!(config.body_html(), "2025-06-01<br><br>欢迎使用");
        assert_eq!(config.animation_ms(), 500);
        assert_eq!(config.button_or_default(), "知道了");
    }

    #[test]
    fn defaults_apply_when_fields_missing() {
        let config: PopupConfig = serde_json::from_value(json!({ "showPopup": true })).unwrap();
        assert_eq!(config.title_or_default(), "通知");
        assert_eq!(config.button_or_default(), "确定");
        assert_eq!(config.body_html(), "");
        assert_eq!(config.animation_ms(), 300);
        assert!(!config.should_show(true, Some("")));
    }
}
