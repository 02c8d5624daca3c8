use anecdote_ui::core::catalog::{Region, parse_catalog, versions};
use anecdote_ui::core::completion::{CompletionMap, parse_import};
use anecdote_ui::core::completion_store::{
    COMPLETED_TASKS_KEY, Clock, CompletionRecords, CompletionStore, KeyValueStorage,
};
use anecdote_ui::core::error::{BackendError, ImportError, NO_ROWS_CODE};
use anecdote_ui::core::modal::{CloseTrigger, ModalPhase, ModalState};
use anecdote_ui::core::popup::PopupConfig;
use anecdote_ui::core::session::{Session, SessionTransition, SessionUser};
use anecdote_ui::core::filter::{FilterCriteria, FilteredView};
use anecdote_ui::core::store::{AppStore, apply_session, clear_filters, set_catalog, set_completion};
use async_trait::async_trait;
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

fn dataset() -> String {
    json!([
        { "id": "a1", "character": "安柏", "version": "4.0", "travelName": "风起",
          "location": "蒙德城", "description": "侦察骑士的日常" },
        { "id": "a2", "character": "钟离", "version": "4.1", "travelName": "往生",
          "location": "璃月港", "hiddenCondition": "雨天", "isHidden": true },
        { "id": "a3", "character": "芙宁娜", "version": "4.1", "travelName": "谢幕",
          "location": "枫丹廷", "extraCharacter": "那维莱特" }
    ])
    .to_string()
}

#[derive(Clone, Default)]
struct SharedStorage(Rc<RefCell<HashMap<String, String>>>);

impl KeyValueStorage for SharedStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.0.borrow_mut().remove(key);
    }
}

#[derive(Clone, Default)]
struct SharedRecords(Rc<RefCell<HashMap<String, CompletionMap>>>);

#[async_trait(?Send)]
impl CompletionRecords for SharedRecords {
    async fn select(&self, user_id: &str) -> Result<CompletionMap, BackendError> {
        self.0
            .borrow()
            .get(user_id)
            .cloned()
            .ok_or_else(|| BackendError::with_code(NO_ROWS_CODE, "no rows returned"))
    }

    async fn upsert(&self, user_id: &str, tasks: &CompletionMap) -> Result<(), BackendError> {
        self.0.borrow_mut().insert(user_id.to_string(), tasks.clone());
        Ok(())
    }
}

struct FrozenClock;

impl Clock for FrozenClock {
    fn now_ms(&self) -> u64 {
        0
    }
}

fn user(id: &str) -> SessionUser {
    SessionUser {
        id: id.to_string(),
        email: Some(format!("{id}@example.com")),
    }
}

fn view_of(store: &AppStore) -> FilteredView {
    FilteredView::build(&store.catalog.items, &store.filters, &store.completion)
}

fn visible_ids(store: &AppStore) -> Vec<String> {
    view_of(store).items.iter().map(|item| item.id.clone()).collect()
}

#[test]
fn catalog_filters_and_counts_follow_the_store() -> Result<(), serde_json::Error> {
    let items = parse_catalog(&dataset())?;
    assert_eq!(versions(&items), vec!["4.0".to_string(), "4.1".to_string()]);
    assert_eq!(items[2].region(), Some(Region::Fontaine));

    let mut store = AppStore::default();
    set_catalog(&mut store, items);
    set_completion(&mut store, [("a2".to_string(), true)].into_iter().collect());

    store.filters.version = "4.1".to_string();
    assert_eq!(visible_ids(&store), vec!["a2", "a3"]);

    store.filters.only_incomplete = true;
    let counts = view_of(&store).counts;
    assert_eq!((counts.total, counts.visible, counts.incomplete), (3, 1, 2));

    store.filters.search = "那维莱特".to_string();
    assert!(visible_ids(&store).is_empty());
    store.filters.search = "谢幕".to_string();
    assert_eq!(visible_ids(&store), vec!["a3"]);

    clear_filters(&mut store);
    assert_eq!(store.filters, FilterCriteria::default());
    assert_eq!(view_of(&store).counts.visible, 3);
    Ok(())
}

#[tokio::test]
async fn anonymous_progress_survives_sign_in_and_is_cleared_on_sign_out() {
    let local = SharedStorage::default();
    let records = SharedRecords::default();
    records.0.borrow_mut().insert(
        "u1".to_string(),
        [("a1".to_string(), false), ("a3".to_string(), true)]
            .into_iter()
            .collect(),
    );
    let completion = CompletionStore::new(local.clone(), records.clone(), FrozenClock, 5_000);

    let anonymous = completion
        .set("a1", true)
        .await
        .expect("local write succeeds");
    assert!(anonymous.is_done("a1"));
    assert!(local.get_item(COMPLETED_TASKS_KEY).is_some());

    let mut app = AppStore::default();
    let transition = apply_session(&mut app, Session::from_user(Some(user("u1"))));
    assert_eq!(transition, SessionTransition::SignedIn(user("u1")));

    completion.set_user(Some(user("u1")));
    let merged = completion
        .sync_on_login()
        .await
        .expect("sync succeeds")
        .expect("signed in");
    assert!(!merged.is_done("a1"), "remote wins on conflicts");
    assert!(merged.is_done("a3"));
    assert_eq!(records.0.borrow().get("u1"), Some(&merged));
    assert_eq!(completion.get().await, merged);

    let transition = apply_session(&mut app, Session::from_user(None));
    assert_eq!(transition, SessionTransition::SignedOut);
    assert!(app.completion.is_empty());
    completion.set_user(None);
    completion.clear_local();
    assert!(local.get_item(COMPLETED_TASKS_KEY).is_none());
    assert!(completion.get().await.is_empty());
}

#[tokio::test]
async fn import_replaces_the_active_medium() {
    let completion = CompletionStore::new(
        SharedStorage::default(),
        SharedRecords::default(),
        FrozenClock,
        5_000,
    );
    assert!(matches!(
        parse_import("[true]"),
        Err(ImportError::NotAnObject { found: "array" })
    ));
    assert!(matches!(parse_import("{"), Err(ImportError::Parse { .. })));

    let imported = parse_import(r#"{"a1": true, "a2": "yes", "a3": false}"#)
        .expect("object import parses");
    assert_eq!(imported.len(), 2);
    completion
        .replace(&imported)
        .await
        .expect("local replace succeeds");
    assert_eq!(completion.get().await, imported);
}

#[test]
fn notice_popup_reappears_only_for_a_new_stamp() {
    let config = PopupConfig {
        show_popup: true,
        time: Some("2024-06-01".to_string()),
        ..PopupConfig::default()
    };
    assert!(config.should_show(false, None));
    assert!(!config.should_show(true, Some("2024-06-01")));
    assert!(config.should_show(true, Some("2024-05-01")));

    let disabled = PopupConfig::default();
    assert!(!disabled.should_show(false, None));
}

#[test]
fn reopening_a_closing_modal_discards_the_pending_close() {
    let mut modal = ModalState::new(300);
    modal.open();
    let stale = modal
        .request_close(CloseTrigger::Escape)
        .expect("visible modal closes");
    assert_eq!(modal.phase(), ModalPhase::Closing);

    modal.open();
    assert!(!modal.finish_close(stale));
    assert_eq!(modal.phase(), ModalPhase::Visible);

    let ticket = modal
        .request_close(CloseTrigger::Backdrop)
        .expect("visible modal closes");
    assert_eq!(ticket.delay_ms, 300);
    assert!(modal.finish_close(ticket));
    assert_eq!(modal.phase(), ModalPhase::Hidden);
    assert!(modal.request_close(CloseTrigger::CloseControl).is_none());
}
