//! Core, DOM-free primitives and helpers for the Web UI.
pub mod catalog;
pub mod completion;
pub mod completion_store;
pub mod config;
pub mod dropdown;
pub mod error;
pub mod filter;
pub mod markdown;
pub mod modal;
pub mod popup;
pub mod session;
pub mod store;
pub mod ui;
