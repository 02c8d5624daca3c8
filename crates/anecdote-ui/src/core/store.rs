//! App-wide yewdux store slices.
//!
//! # Design
//! - Keep shared UI state in one store to avoid ad-hoc contexts.
//! - Use small, focused slices so reducers stay predictable.
//! - The completion snapshot here is what the view renders; the completion store owns
//!   the authoritative medium and its cache.

use crate::core::catalog::CatalogItem;
use crate::core::completion::CompletionMap;
use crate::core::dropdown::DropdownGroup;
use crate::core::filter::FilterCriteria;
use crate::core::session::{Session, SessionTransition, session_status};
use std::rc::Rc;
use yewdux::store::Store;

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Store, Default)]
pub struct AppStore {
    /// Loaded catalog.
    pub catalog: CatalogSlice,
    /// Auth session and status line.
    pub auth: AuthSlice,
    /// Filter inputs.
    pub filters: FilterCriteria,
    /// Last completion snapshot used for rendering.
    pub completion: CompletionMap,
    /// Which custom dropdown is expanded.
    pub dropdowns: DropdownGroup,
    /// Bumped by every "clear filters" so inputs holding unsent edits drop them.
    pub filter_resets: u64,
}

/// Catalog load state.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    /// Fetch in flight.
    #[default]
    Loading,
    /// Catalog available.
    Ready,
    /// Fetch or parse failed; the list stays empty.
    Failed(String),
}

/// Catalog slice.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CatalogSlice {
    /// Items in dataset order.
    pub items: Rc<Vec<CatalogItem>>,
    /// Load state.
    pub status: CatalogStatus,
}

/// Auth slice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSlice {
    /// Current session.
    pub session: Session,
    /// Status area text.
    pub status: String,
    /// Auth request in flight.
    pub busy: bool,
}

impl Default for AuthSlice {
    fn default() -> Self {
        Self {
            session: Session::Anonymous,
            status: session_status(&Session::Anonymous),
            busy: false,
        }
    }
}

/// Install a freshly loaded catalog.
pub fn set_catalog(store: &mut AppStore, items: Vec<CatalogItem>) {
    store.catalog.items = Rc::new(items);
    store.catalog.status = CatalogStatus::Ready;
}

/// Record a catalog load failure.
pub fn set_catalog_failed(store: &mut AppStore, reason: String) {
    store.catalog.status = CatalogStatus::Failed(reason);
}

/// Replace the rendered completion snapshot.
pub fn set_completion(store: &mut AppStore, completion: CompletionMap) {
    store.completion = completion;
}

/// Apply a session change, update the status line, and return the transition.
pub fn apply_session(store: &mut AppStore, next: Session) -> SessionTransition {
    let transition = store.auth.session.transition_to(&next);
    if transition != SessionTransition::Unchanged {
        store.auth.status = session_status(&next);
    }
    if transition == SessionTransition::SignedOut {
        store.completion = CompletionMap::new();
    }
    store.auth.session = next;
    transition
}

/// Reset every filter to its default.
pub fn clear_filters(store: &mut AppStore) {
    store.filters = FilterCriteria::default();
    store.dropdowns = DropdownGroup::default();
    store.filter_resets = store.filter_resets.wrapping_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SessionUser;

    fn item(id: &str, location: &str) -> CatalogItem {
        CatalogItem {
            id: id.into(),
            character: "c".into(),
            version: "1.0".into(),
            travel_name: "t".into(),
            location: location.into(),
            hidden_condition: None,
            extra_character: None,
            description: String::new(),
            is_hidden: false,
        }
    }

    #[test]
    fn sign_out_clears_rendered_completion() {
        let mut store = AppStore::default();
        let user = SessionUser {
            id: "u".into(),
            email: None,
        };
        assert_eq!(
            apply_session(&mut store, Session::Authenticated(user.clone())),
            SessionTransition::SignedIn(user)
        );
        assert_eq!(store.auth.status, "已登录: u");
        store.completion.set("1", true);
        assert_eq!(
            apply_session(&mut store, Session::Anonymous),
            SessionTransition::SignedOut
        );
        assert!(store.completion.is_empty());
        assert_eq!(store.auth.status, "未登录");
    }

    #[test]
    fn clear_filters_resets_inputs_even_when_already_default() {
        let mut store = AppStore::default();
        set_catalog(&mut store, vec![item("1", "蒙德"), item("2", "璃月")]);
        store.filters.region = "璃月".into();
        store.filters.only_incomplete = true;
        store.dropdowns = store.dropdowns.toggled("region-filter");
        clear_filters(&mut store);
        assert_eq!(store.filters, FilterCriteria::default());
        assert!(!store.dropdowns.is_open("region-filter"));
        assert_eq!(store.filter_resets, 1);

        clear_filters(&mut store);
        assert_eq!(store.filter_resets, 2);
    }
}
