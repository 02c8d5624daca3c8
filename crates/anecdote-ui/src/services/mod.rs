//! Browser-facing services: hosted backend client, local storage, documents, files.

pub(crate) mod backend;
pub(crate) mod documents;
pub(crate) mod files;
pub(crate) mod storage;

use crate::core::completion_store::{Clock, CompletionStore};
use backend::BackendClient;
use std::rc::Rc;
use storage::BrowserStorage;

/// Wall clock backed by `Date.now()`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserClock;

impl Clock for BrowserClock {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn now_ms(&self) -> u64 {
        js_sys::Date::now().max(0.0) as u64
    }
}

/// Completion store wired to browser media.
pub(crate) type BrowserCompletionStore =
    CompletionStore<BrowserStorage, Rc<BackendClient>, BrowserClock>;
