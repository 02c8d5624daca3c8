//! Catalog items and region classification.
//!
//! # Design
//! - Catalog entries are immutable for the session; share them behind `Rc` at the call site.
//! - Region detection is an ordered substring scan over the location; first match wins.

use serde::Deserialize;

/// One trackable anecdote entry from the bundled dataset.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Stable identifier used as the completion key.
    pub id: String,
    /// Character the anecdote belongs to.
    pub character: String,
    /// Game version tag the anecdote shipped in.
    pub version: String,
    /// Travel-event name.
    pub travel_name: String,
    /// Free-form location string (contains the region name).
    pub location: String,
    /// Hidden-trigger condition, when the anecdote has one.
    #[serde(default)]
    pub hidden_condition: Option<String>,
    /// Extra character appearing in the anecdote.
    #[serde(default)]
    pub extra_character: Option<String>,
    /// Description text.
    #[serde(default)]
    pub description: String,
    /// Whether the anecdote is a hidden one.
    #[serde(default)]
    pub is_hidden: bool,
}

impl CatalogItem {
    /// Region this item belongs to, derived from its location.
    #[must_use]
    pub fn region(&self) -> Option<Region> {
        Region::classify(&self.location)
    }

    /// Hidden condition for display, `-` when absent.
    #[must_use]
    pub fn hidden_condition_label(&self) -> &str {
        display_or_dash(self.hidden_condition.as_deref())
    }

    /// Extra character for display, `-` when absent.
    #[must_use]
    pub fn extra_character_label(&self) -> &str {
        display_or_dash(self.extra_character.as_deref())
    }
}

fn display_or_dash(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.is_empty() => text,
        _ => "-",
    }
}

/// Known regions in the order they are checked against a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// 蒙德
    Mondstadt,
    /// 璃月
    Liyue,
    /// 稻妻
    Inazuma,
    /// 须弥
    Sumeru,
    /// 枫丹
    Fontaine,
    /// 纳塔
    Natlan,
    /// 挪德
    Nordkala,
}

impl Region {
    /// Ordered region table; classification walks this front to back.
    pub const ALL: [Self; 7] = [
        Self::Mondstadt,
        Self::Liyue,
        Self::Inazuma,
        Self::Sumeru,
        Self::Fontaine,
        Self::Natlan,
        Self::Nordkala,
    ];

    /// Region name as it appears inside location strings.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Mondstadt => "蒙德",
            Self::Liyue => "璃月",
            Self::Inazuma => "稻妻",
            Self::Sumeru => "须弥",
            Self::Fontaine => "枫丹",
            Self::Natlan => "纳塔",
            Self::Nordkala => "挪德",
        }
    }

    /// Stable slug used in CSS class names.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Mondstadt => "mondstadt",
            Self::Liyue => "liyue",
            Self::Inazuma => "inazuma",
            Self::Sumeru => "sumeru",
            Self::Fontaine => "fontaine",
            Self::Natlan => "natlan",
            Self::Nordkala => "nordkala",
        }
    }

    /// Table row class (`region-<slug>`).
    #[must_use]
    pub fn row_class(self) -> String {
        format!("region-{}", self.slug())
    }

    /// Card class (`card-<slug>`).
    #[must_use]
    pub fn card_class(self) -> String {
        format!("card-{}", self.slug())
    }

    /// First region whose marker occurs in `location`.
    #[must_use]
    pub fn classify(location: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|region| location.contains(region.marker()))
    }
}

/// Parse the bundled dataset document.
///
/// # Errors
/// Returns the JSON error when the document is not an array of catalog items.
pub fn parse_catalog(raw: &str) -> Result<Vec<CatalogItem>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Distinct version tags in first-seen order, for the version selector.
#[must_use]
pub fn versions(items: &[CatalogItem]) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for item in items {
        if !seen.iter().any(|v| v == &item.version) {
            seen.push(item.version.clone());
        }
    }
    seen
}
