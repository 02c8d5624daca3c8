//! UI primitives shared across the crate (layout mode, font preference, scroll button).

/// Local storage key for the font preference.
pub const FONT_PREFERENCE_KEY: &str = "fontPreference";

/// Layout used for the catalog list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    /// Card list for narrow viewports.
    Card,
    /// Table for desktop viewports.
    Table,
}

/// Layout for a viewport width; widths at or below `breakpoint` get cards.
#[must_use]
pub const fn layout_for_width(width: u32, breakpoint: u32) -> LayoutMode {
    if width <= breakpoint {
        LayoutMode::Card
    } else {
        LayoutMode::Table
    }
}

/// Whether the scroll-to-top button should be shown at `scroll_y`.
#[must_use]
pub fn scroll_top_visible(scroll_y: f64, threshold: u32) -> bool {
    scroll_y > f64::from(threshold)
}

/// Font choice offered by the font-license dialog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontPreference {
    /// Derived web font shipped with the page.
    #[default]
    Derived,
    /// Original licensed font.
    Original,
}

impl FontPreference {
    /// Stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Derived => "derived",
            Self::Original => "original",
        }
    }

    /// Parse a stored value; anything unknown keeps the derived font.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("original") => Self::Original,
            _ => Self::Derived,
        }
    }

    /// Override stylesheet to inject for this preference, if any.
    #[must_use]
    pub const fn override_css(self) -> Option<&'static str> {
        match self {
            Self::Derived => None,
            Self::Original => Some(
                "@font-face { font-family: \"IPAMJM\"; src: url(\"font/ipamjm.woff2\"); }\n\
                 * { font-family: \"IPAMJM\" !important; }\n\
                 body { font-family: \"IPAMJM\", serif !important; }",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_preference_round_trips_stored_value() {
        assert_eq!(FontPreference::from_stored(Some("original")), FontPreference::Original);
        assert_eq!(FontPreference::from_stored(Some("weird")), FontPreference::Derived);
        assert_eq!(FontPreference::from_stored(None), FontPreference::Derived);
        assert!(FontPreference::Original.override_css().is_some());
        assert!(FontPreference::Derived.override_css().is_none());
    }

    #[test]
    fn scroll_button_threshold_is_exclusive() {
        assert!(!scroll_top_visible(200.0, 200));
        assert!(scroll_top_visible(200.5, 200));
    }
}
