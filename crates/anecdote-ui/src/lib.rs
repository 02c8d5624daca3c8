#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Anecdote tracker web UI.
//! This crate holds the Yew front-end entrypoint plus the DOM-free catalog,
//! filtering, completion and modal logic it is built on.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod components;
#[cfg(target_arch = "wasm32")]
mod services;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;

#[cfg(test)]
mod tests {
    use crate::core::catalog::Region;
    use crate::core::ui::{LayoutMode, layout_for_width};

    #[test]
    fn layout_switches_at_mobile_breakpoint() {
        assert_eq!(layout_for_width(375, 768), LayoutMode::Card);
        assert_eq!(layout_for_width(768, 768), LayoutMode::Card);
        assert_eq!(layout_for_width(769, 768), LayoutMode::Table);
    }

    #[test]
    fn region_table_is_ordered_and_complete() {
        assert_eq!(Region::ALL.len(), 7);
        assert_eq!(Region::ALL[0], Region::Mondstadt);
        assert_eq!(Region::ALL[6], Region::Nordkala);
    }
}
