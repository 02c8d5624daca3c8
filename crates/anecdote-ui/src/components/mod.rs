//! Yew components composing the tracker page.

pub(crate) mod auth;
pub(crate) mod catalog;
pub(crate) mod changelog;
pub(crate) mod data_tools;
pub(crate) mod dialogs;
pub(crate) mod dropdown;
pub(crate) mod modal;
pub(crate) mod popup;
pub(crate) mod raw_html;
pub(crate) mod scroll_top;
pub(crate) mod toolbar;
