//! Catalog filtering and the counters shown beside the list.
//!
//! # Design
//! - `filter_items` is pure over (catalog, criteria, completion map).
//! - `FilteredView` bundles the filtered list with its counters; the view keeps the last
//!   one keyed on its inputs and rebuilds only when one of them changes.
//! - Selector values use the sentinel `all` for "no constraint", matching the option values.

use crate::core::catalog::CatalogItem;
use crate::core::completion::{CompletionMap, incomplete_count};
use std::rc::Rc;

/// Selector value meaning "no constraint".
pub const ALL: &str = "all";

/// Current filter inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Free-text search term.
    pub search: String,
    /// Region selector value (`all` or a region name).
    pub region: String,
    /// Version selector value (`all` or a version tag).
    pub version: String,
    /// Hide items already marked done.
    pub only_incomplete: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            region: ALL.to_string(),
            version: ALL.to_string(),
            only_incomplete: false,
        }
    }
}

impl FilterCriteria {
    /// Whether `item` satisfies every active predicate.
    #[must_use]
    pub fn matches(&self, item: &CatalogItem, completion: &CompletionMap) -> bool {
        let needle = self.search.to_lowercase();
        self.matches_search(item, &needle)
            && (self.version == ALL || item.version == self.version)
            && (self.region == ALL || item.location.contains(&self.region))
            && !(self.only_incomplete && completion.is_done(&item.id))
    }

    fn matches_search(&self, item: &CatalogItem, needle: &str) -> bool {
        if self.search.is_empty() {
            return true;
        }
        [
            &item.character,
            &item.travel_name,
            &item.location,
            &item.description,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Items satisfying `criteria`, in catalog order.
#[must_use]
pub fn filter_items<'a>(
    items: &'a [CatalogItem],
    criteria: &FilterCriteria,
    completion: &CompletionMap,
) -> Vec<&'a CatalogItem> {
    items
        .iter()
        .filter(|item| criteria.matches(item, completion))
        .collect()
}

/// Counters displayed with each render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ViewCounts {
    /// Catalog size.
    pub total: usize,
    /// Items currently visible.
    pub visible: usize,
    /// Catalog items not yet done.
    pub incomplete: usize,
}

impl ViewCounts {
    /// Compute counters for a render.
    #[must_use]
    pub fn compute(items: &[CatalogItem], visible: usize, completion: &CompletionMap) -> Self {
        Self {
            total: items.len(),
            visible,
            incomplete: incomplete_count(items, completion),
        }
    }
}

/// Filtered catalog plus the counters for one render.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FilteredView {
    /// Visible items in catalog order.
    pub items: Rc<Vec<CatalogItem>>,
    /// Counters matching `items`.
    pub counts: ViewCounts,
}

impl FilteredView {
    /// Run the filter once and derive the counters from its result.
    #[must_use]
    pub fn build(
        items: &[CatalogItem],
        criteria: &FilterCriteria,
        completion: &CompletionMap,
    ) -> Self {
        let visible: Vec<CatalogItem> = filter_items(items, criteria, completion)
            .into_iter()
            .cloned()
            .collect();
        let counts = ViewCounts::compute(items, visible.len(), completion);
        Self {
            items: Rc::new(visible),
            counts,
        }
    }
}
