//! Shared service context for the component tree.
//!
//! # Design
//! - Create exactly one backend client and completion store per app boot.
//! - Components reach them through context instead of globals.

use crate::core::config::AppConfig;
use crate::services::backend::BackendClient;
use crate::services::storage::BrowserStorage;
use crate::services::{BrowserClock, BrowserCompletionStore};
use std::rc::Rc;

/// Services shared by every component.
#[derive(Clone)]
pub(crate) struct AppCtx {
    pub(crate) config: Rc<AppConfig>,
    pub(crate) backend: Rc<BackendClient>,
    pub(crate) completion: Rc<BrowserCompletionStore>,
}

impl AppCtx {
    pub(crate) fn new(config: Rc<AppConfig>) -> Self {
        let backend = Rc::new(BackendClient::new(&config));
        let completion = Rc::new(BrowserCompletionStore::new(
            BrowserStorage,
            backend.clone(),
            BrowserClock,
            config.cache_ttl_ms,
        ));
        Self {
            config,
            backend,
            completion,
        }
    }
}

impl PartialEq for AppCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.backend, &other.backend)
    }
}
