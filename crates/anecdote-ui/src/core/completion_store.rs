//! Completion store: one authoritative backing medium plus a short-lived read cache.
//!
//! # Design
//! - The active medium follows the session user: remote record when signed in, local
//!   storage otherwise. Switching the user invalidates the cache.
//! - Reads within the cache window are served from the snapshot; every mutation
//!   invalidates synchronously before touching the medium.
//! - A generation counter stops a read that started before a write from repopulating
//!   the cache with pre-write data once it resolves.
//! - All methods take `&self`; the store lives on the single UI thread behind `Rc`.
//! - Writes run one at a time, so a read-modify-write never starts from a record an
//!   earlier write is about to replace.

use crate::core::completion::CompletionMap;
use crate::core::error::{BackendError, StoreError, StoreResult};
use crate::core::session::SessionUser;
use async_trait::async_trait;
use futures::lock::Mutex;
use std::cell::{Cell, RefCell};

/// Local storage key holding the anonymous completion blob.
pub const COMPLETED_TASKS_KEY: &str = "completedTasks";

/// Minimal string key/value storage (browser local storage in production).
pub trait KeyValueStorage {
    /// Read a raw value.
    fn get_item(&self, key: &str) -> Option<String>;
    /// Write a raw value, returning a storage detail string on failure.
    ///
    /// # Errors
    /// Returns the storage layer's description when the write is refused.
    fn set_item(&self, key: &str, value: &str) -> Result<(), String>;
    /// Remove a value; missing keys are ignored.
    fn remove_item(&self, key: &str);
}

/// Remote per-user completion record.
#[async_trait(?Send)]
pub trait CompletionRecords {
    /// Select the record for `user_id`.
    ///
    /// # Errors
    /// Returns the backend error; a missing record is reported with the
    /// [`crate::core::error::NO_ROWS_CODE`] code.
    async fn select(&self, user_id: &str) -> Result<CompletionMap, BackendError>;

    /// Upsert the full map for `user_id`, keyed on the user id.
    ///
    /// # Errors
    /// Returns the backend error when the write is rejected.
    async fn upsert(&self, user_id: &str, tasks: &CompletionMap) -> Result<(), BackendError>;
}

/// Monotonic millisecond clock.
pub trait Clock {
    /// Current time in milliseconds.
    fn now_ms(&self) -> u64;
}

/// Cached completion snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
struct CacheEntry {
    map: CompletionMap,
    fetched_at_ms: u64,
}

/// Completion store over a local key/value medium and a remote record medium.
pub struct CompletionStore<S, R, C> {
    local: S,
    remote: R,
    clock: C,
    ttl_ms: u64,
    user: RefCell<Option<SessionUser>>,
    cache: RefCell<Option<CacheEntry>>,
    generation: Cell<u64>,
    writes: Mutex<()>,
}

impl<S, R, C> CompletionStore<S, R, C>
where
    S: KeyValueStorage,
    R: CompletionRecords,
    C: Clock,
{
    /// Build an anonymous store with the given cache window.
    pub fn new(local: S, remote: R, clock: C, ttl_ms: u64) -> Self {
        Self {
            local,
            remote,
            clock,
            ttl_ms,
            user: RefCell::new(None),
            cache: RefCell::new(None),
            generation: Cell::new(0),
            writes: Mutex::new(()),
        }
    }

    /// Switch the backing medium to follow `user` (or local storage for `None`).
    pub fn set_user(&self, user: Option<SessionUser>) {
        *self.user.borrow_mut() = user;
        self.invalidate();
    }

    /// Current session user, if any.
    pub fn user(&self) -> Option<SessionUser> {
        self.user.borrow().clone()
    }

    /// Drop the cached snapshot. Any read already in flight will not repopulate it.
    pub fn invalidate(&self) {
        self.cache.borrow_mut().take();
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    /// Full completion map for the current session.
    ///
    /// Remote "no record" reads as empty; any other remote failure is logged and
    /// degrades to an empty map. Unreadable local data also reads as empty.
    pub async fn get(&self) -> CompletionMap {
        if let Some(map) = self.cached() {
            return map;
        }
        let generation = self.generation.get();
        match self.load().await {
            Ok(map) => {
                if self.generation.get() == generation {
                    *self.cache.borrow_mut() = Some(CacheEntry {
                        map: map.clone(),
                        fetched_at_ms: self.clock.now_ms(),
                    });
                }
                map
            }
            Err(err) => {
                tracing::warn!(error = %err, "completion read degraded to empty map");
                CompletionMap::new()
            }
        }
    }

    /// Merge one id/done pair into the active medium.
    ///
    /// # Errors
    /// Fails when the current remote record cannot be read (the write is skipped so
    /// the record is not clobbered) or when persisting fails.
    pub async fn set(&self, id: &str, done: bool) -> StoreResult<CompletionMap> {
        let _write = self.writes.lock().await;
        self.invalidate();
        let mut map = self.load().await?;
        map.set(id, done);
        self.persist(&map).await?;
        self.invalidate();
        Ok(map)
    }

    /// Replace the active medium's map wholesale (import flow).
    ///
    /// # Errors
    /// Propagates persistence failures.
    pub async fn replace(&self, map: &CompletionMap) -> StoreResult<()> {
        let _write = self.writes.lock().await;
        self.invalidate();
        let result = self.persist(map).await;
        self.invalidate();
        result
    }

    /// Reconcile local and remote data after sign-in; remote wins on conflicts.
    ///
    /// The merged map is written to local storage and the remote record. Returns
    /// `Ok(None)` when no user is signed in.
    ///
    /// # Errors
    /// Fails when the remote record cannot be read (local data is left untouched)
    /// or when either write fails.
    pub async fn sync_on_login(&self) -> StoreResult<Option<CompletionMap>> {
        let Some(user) = self.user() else {
            return Ok(None);
        };
        let _write = self.writes.lock().await;
        self.invalidate();
        let remote = self.load_remote(&user.id).await?;
        let local = self.load_local();
        let merged = local.merged_with_remote(&remote);
        self.write_local(&merged)?;
        let upload = self
            .remote
            .upsert(&user.id, &merged)
            .await
            .map_err(|source| StoreError::Remote {
                operation: "sync_upsert",
                source,
            });
        self.invalidate();
        upload?;
        tracing::debug!(keys = merged.len(), "completion data synced after login");
        Ok(Some(merged))
    }

    /// Remove the local completion blob (sign-out).
    pub fn clear_local(&self) {
        self.local.remove_item(COMPLETED_TASKS_KEY);
        self.invalidate();
    }

    fn cached(&self) -> Option<CompletionMap> {
        let cache = self.cache.borrow();
        let entry = cache.as_ref()?;
        let age = self.clock.now_ms().saturating_sub(entry.fetched_at_ms);
        (age < self.ttl_ms).then(|| entry.map.clone())
    }

    async fn load(&self) -> StoreResult<CompletionMap> {
        match self.user() {
            Some(user) => self.load_remote(&user.id).await,
            None => Ok(self.load_local()),
        }
    }

    async fn load_remote(&self, user_id: &str) -> StoreResult<CompletionMap> {
        match self.remote.select(user_id).await {
            Ok(map) => Ok(map),
            Err(err) if err.is_no_rows() => Ok(CompletionMap::new()),
            Err(source) => Err(StoreError::Remote {
                operation: "select",
                source,
            }),
        }
    }

    fn load_local(&self) -> CompletionMap {
        CompletionMap::from_stored(self.local.get_item(COMPLETED_TASKS_KEY).as_deref())
    }

    fn write_local(&self, map: &CompletionMap) -> StoreResult<()> {
        let raw = serde_json::to_string(map).map_err(|source| StoreError::Serialize { source })?;
        self.local
            .set_item(COMPLETED_TASKS_KEY, &raw)
            .map_err(|detail| StoreError::Local {
                operation: "write",
                key: COMPLETED_TASKS_KEY,
                detail,
            })
    }

    async fn persist(&self, map: &CompletionMap) -> StoreResult<()> {
        match self.user() {
            Some(user) => self
                .remote
                .upsert(&user.id, map)
                .await
                .map_err(|source| StoreError::Remote {
                    operation: "upsert",
                    source,
                }),
            None => self.write_local(map),
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory media and a manual clock for store tests.

    use super::{Clock, CompletionRecords, KeyValueStorage};
    use crate::core::completion::CompletionMap;
    use crate::core::error::{BackendError, NO_ROWS_CODE};
    use async_trait::async_trait;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    pub(crate) struct MemoryStorage {
        pub(crate) items: Rc<RefCell<HashMap<String, String>>>,
    }

    impl KeyValueStorage for MemoryStorage {
        fn get_item(&self, key: &str) -> Option<String> {
            self.items.borrow().get(key).cloned()
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
            self.items.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove_item(&self, key: &str) {
            self.items.borrow_mut().remove(key);
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct MemoryRecords {
        pub(crate) rows: Rc<RefCell<HashMap<String, CompletionMap>>>,
        pub(crate) selects: Rc<Cell<usize>>,
        pub(crate) fail_with: Rc<RefCell<Option<BackendError>>>,
    }

    #[async_trait(?Send)]
    impl CompletionRecords for MemoryRecords {
        async fn select(&self, user_id: &str) -> Result<CompletionMap, BackendError> {
            tokio::task::yield_now().await;
            self.selects.set(self.selects.get() + 1);
            if let Some(err) = self.fail_with.borrow().clone() {
                return Err(err);
            }
            self.rows.borrow().get(user_id).cloned().ok_or_else(|| {
                BackendError::with_code(NO_ROWS_CODE, "no rows returned")
            })
        }

        async fn upsert(&self, user_id: &str, tasks: &CompletionMap) -> Result<(), BackendError> {
            if let Some(err) = self.fail_with.borrow().clone() {
                return Err(err);
            }
            self.rows
                .borrow_mut()
                .insert(user_id.to_string(), tasks.clone());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct ManualClock {
        pub(crate) now: Rc<Cell<u64>>,
    }

    impl ManualClock {
        pub(crate) fn advance(&self, ms: u64) {
            self.now.set(self.now.get() + ms);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u64 {
            self.now.get()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::{ManualClock, MemoryRecords, MemoryStorage};
    use super::*;
    use crate::core::completion::CompletionMap;

    type TestStore = CompletionStore<MemoryStorage, MemoryRecords, ManualClock>;

    fn store() -> (TestStore, MemoryStorage, MemoryRecords, ManualClock) {
        let local = MemoryStorage::default();
        let remote = MemoryRecords::default();
        let clock = ManualClock::default();
        let store = CompletionStore::new(local.clone(), remote.clone(), clock.clone(), 1_000);
        (store, local, remote, clock)
    }

    fn user() -> SessionUser {
        SessionUser {
            id: "user-1".into(),
            email: Some("traveler@example.com".into()),
        }
    }

    #[tokio::test]
    async fn anonymous_reads_default_to_empty() {
        let (store, local, _, _) = store();
        assert!(store.get().await.is_empty());
        local.set_item(COMPLETED_TASKS_KEY, "not json").unwrap();
        store.invalidate();
        assert!(store.get().await.is_empty());
    }

    #[tokio::test]
    async fn set_then_get_reflects_new_value() {
        let (store, local, _, _) = store();
        assert!(!store.get().await.is_done("1"));
        store.set("1", true).await.unwrap();
        assert!(store.get().await.is_done("1"));
        store.set("1", false).await.unwrap();
        assert!(!store.get().await.is_done("1"));
        assert_eq!(
            local.get_item(COMPLETED_TASKS_KEY).as_deref(),
            Some(r#"{"1":false}"#)
        );
    }

    #[tokio::test]
    async fn reads_inside_window_hit_cache() {
        let (store, _, remote, clock) = store();
        store.set_user(Some(user()));
        store.get().await;
        store.get().await;
        assert_eq!(remote.selects.get(), 1);
        clock.advance(999);
        store.get().await;
        assert_eq!(remote.selects.get(), 1);
        clock.advance(1);
        store.get().await;
        assert_eq!(remote.selects.get(), 2);
    }

    #[tokio::test]
    async fn remote_missing_record_is_empty_and_failures_degrade() {
        let (store, _, remote, _) = store();
        store.set_user(Some(user()));
        assert!(store.get().await.is_empty());
        remote
            .rows
            .borrow_mut()
            .insert("user-1".into(), [("5".to_string(), true)].into_iter().collect());
        store.invalidate();
        assert!(store.get().await.is_done("5"));
        *remote.fail_with.borrow_mut() = Some(BackendError::message("network down"));
        store.invalidate();
        assert!(store.get().await.is_empty());
    }

    #[tokio::test]
    async fn set_skips_write_when_remote_read_fails() {
        let (store, _, remote, _) = store();
        store.set_user(Some(user()));
        remote
            .rows
            .borrow_mut()
            .insert("user-1".into(), [("5".to_string(), true)].into_iter().collect());
        *remote.fail_with.borrow_mut() = Some(BackendError::message("network down"));
        let err = store.set("6", true).await.unwrap_err();
        assert!(matches!(err, StoreError::Remote { operation: "select", .. }));
        remote.fail_with.borrow_mut().take();
        let row = remote.rows.borrow().get("user-1").cloned().unwrap();
        assert!(row.is_done("5"));
        assert!(!row.is_done("6"));
    }

    #[tokio::test]
    async fn sync_on_login_merges_remote_over_local() {
        let (store, local, remote, _) = store();
        local
            .set_item(COMPLETED_TASKS_KEY, r#"{"1":true,"2":true}"#)
            .unwrap();
        remote.rows.borrow_mut().insert(
            "user-1".into(),
            [("2".to_string(), false), ("3".to_string(), true)]
                .into_iter()
                .collect(),
        );
        store.set_user(Some(user()));
        let merged = store.sync_on_login().await.unwrap().unwrap();
        let expected: CompletionMap = [
            ("1".to_string(), true),
            ("2".to_string(), false),
            ("3".to_string(), true),
        ]
        .into_iter()
        .collect();
        assert_eq!(merged, expected);
        assert_eq!(remote.rows.borrow().get("user-1"), Some(&expected));
        assert_eq!(
            CompletionMap::from_stored(local.get_item(COMPLETED_TASKS_KEY).as_deref()),
            expected
        );
        assert_eq!(store.get().await, expected);
    }

    #[tokio::test]
    async fn sync_without_user_is_noop() {
        let (store, _, remote, _) = store();
        assert!(store.sync_on_login().await.unwrap().is_none());
        assert_eq!(remote.selects.get(), 0);
    }

    #[tokio::test]
    async fn clear_local_and_replace_invalidate_cache() {
        let (store, local, _, _) = store();
        store.set("1", true).await.unwrap();
        assert!(store.get().await.is_done("1"));
        store.clear_local();
        assert!(local.get_item(COMPLETED_TASKS_KEY).is_none());
        assert!(store.get().await.is_empty());
        let imported: CompletionMap = [("9".to_string(), true)].into_iter().collect();
        store.replace(&imported).await.unwrap();
        assert_eq!(store.get().await, imported);
    }

    #[tokio::test]
    async fn switching_user_changes_medium() {
        let (store, _, remote, _) = store();
        store.set("1", true).await.unwrap();
        store.set_user(Some(user()));
        assert!(!store.get().await.is_done("1"));
        store.set("2", true).await.unwrap();
        assert!(remote.rows.borrow().get("user-1").unwrap().is_done("2"));
        store.set_user(None);
        assert!(store.get().await.is_done("1"));
        assert!(!store.get().await.is_done("2"));
    }

    #[tokio::test]
    async fn overlapping_toggles_both_reach_the_record() {
        let (store, _, remote, _) = store();
        store.set_user(Some(user()));
        let (first, second) = tokio::join!(store.set("1", true), store.set("2", true));
        first.unwrap();
        second.unwrap();
        let row = remote.rows.borrow().get("user-1").cloned().unwrap();
        assert!(row.is_done("1"));
        assert!(row.is_done("2"));
        assert_eq!(remote.selects.get(), 2);
    }
}
