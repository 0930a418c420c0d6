//! List Controller
//!
//! Owns the displayed page of items and drives every fetch and mutation.
//!
//! Each fetch takes a sequence token; only the most recently started fetch
//! may touch the display state, so a slow response can never overwrite a
//! newer one. Failures become notifications and leave the last good page
//! on screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::{ApiError, ItemApi};
use crate::filter::{FilterState, StatusFilter};
use crate::models::{Item, ItemPayload, PaginatedMeta};
use crate::notify::{Notification, Notifier};

/// What the create/edit modal is showing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Editor {
    #[default]
    Closed,
    Creating,
    Editing(Item),
}

impl Editor {
    pub fn is_open(&self) -> bool {
        !matches!(self, Editor::Closed)
    }

    pub fn item(&self) -> Option<&Item> {
        match self {
            Editor::Editing(item) => Some(item),
            _ => None,
        }
    }
}

/// Complete display state at one instant
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListSnapshot {
    pub filter: FilterState,
    pub items: Vec<Item>,
    pub meta: Option<PaginatedMeta>,
    /// The latest fetch has not settled yet
    pub loading: bool,
    /// A create, update or delete is in flight
    pub busy: bool,
    pub editor: Editor,
    /// Item awaiting delete confirmation
    pub pending_delete: Option<Item>,
}

pub type Listener = Box<dyn Fn(&ListSnapshot) + Send + Sync>;

pub struct ListController<A, N> {
    api: A,
    notifier: N,
    state: Mutex<ListSnapshot>,
    /// Filter behind the items currently on screen
    applied: Mutex<FilterState>,
    latest_fetch: AtomicU64,
    listener: Option<Listener>,
}

/// Clears the busy flag when dropped, whichever way the operation ends
struct BusyGuard<'a, A: ItemApi, N: Notifier> {
    controller: &'a ListController<A, N>,
}

impl<A: ItemApi, N: Notifier> Drop for BusyGuard<'_, A, N> {
    fn drop(&mut self) {
        self.controller.update(|s| s.busy = false);
    }
}

impl<A: ItemApi, N: Notifier> ListController<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            state: Mutex::new(ListSnapshot::default()),
            applied: Mutex::new(FilterState::default()),
            latest_fetch: AtomicU64::new(0),
            listener: None,
        }
    }

    /// Call `listener` with a fresh snapshot after every state change
    pub fn with_listener(mut self, listener: impl Fn(&ListSnapshot) + Send + Sync + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ListSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate state under the lock, then publish the result
    fn update<R>(&self, f: impl FnOnce(&mut ListSnapshot) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.lock();
            let result = f(&mut state);
            (result, state.clone())
        };
        if let Some(listener) = &self.listener {
            listener(&snapshot);
        }
        result
    }

    fn begin_busy(&self) -> Option<BusyGuard<'_, A, N>> {
        let acquired = self.update(|s| !std::mem::replace(&mut s.busy, true));
        acquired.then_some(BusyGuard { controller: self })
    }

    fn notify_error(&self, err: &ApiError, fallback: &str) {
        let message = err.to_string();
        let message = if message.trim().is_empty() { fallback.to_string() } else { message };
        log::warn!("[LIST] {}: {}", fallback, message);
        self.notifier.notify(Notification::error(message));
    }

    // ========================
    // Fetch Cycle
    // ========================

    /// Fetch the page described by the current filter
    ///
    /// When the latest fetch fails the filter rolls back to the one behind
    /// the rows still on screen, so repeating the same change fetches again.
    pub async fn refresh(&self) {
        let (seq, requested) = self.update(|s| {
            s.loading = true;
            let seq = self.latest_fetch.fetch_add(1, Ordering::SeqCst) + 1;
            (seq, s.filter.clone())
        });
        let query = requested.to_query();
        log::debug!("[LIST] fetch #{} {:?}", seq, query);

        let result = self.api.list(&query).await;

        if self.latest_fetch.load(Ordering::SeqCst) != seq {
            log::debug!("[LIST] fetch #{} superseded, discarding", seq);
            return;
        }

        match result {
            Ok(page) => {
                log::debug!("[LIST] fetch #{} loaded {} items", seq, page.items.len());
                *self.applied.lock().unwrap_or_else(PoisonError::into_inner) = requested;
                self.update(|s| {
                    s.items = page.items;
                    s.meta = Some(page.meta);
                    s.loading = false;
                });
            }
            Err(err) => {
                let applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner).clone();
                self.update(|s| {
                    s.loading = false;
                    s.filter = applied;
                });
                self.notify_error(&err, "Failed to load items");
            }
        }
    }

    pub async fn set_search(&self, search: &str) {
        if self.update(|s| s.filter.set_search(search)) {
            self.refresh().await;
        }
    }

    pub async fn set_status(&self, status: StatusFilter) {
        if self.update(|s| s.filter.set_status(status)) {
            self.refresh().await;
        }
    }

    pub async fn set_limit(&self, limit: u32) {
        if self.update(|s| s.filter.set_limit(limit)) {
            self.refresh().await;
        }
    }

    pub async fn set_page(&self, page: u32) {
        if self.update(|s| s.filter.set_page(page)) {
            self.refresh().await;
        }
    }

    // ========================
    // Editor
    // ========================

    pub fn open_create(&self) {
        self.update(|s| s.editor = Editor::Creating);
    }

    pub fn open_edit(&self, item: Item) {
        self.update(|s| s.editor = Editor::Editing(item));
    }

    /// Close the modal unless a save is still in flight
    pub fn close_editor(&self) {
        self.update(|s| {
            if !s.busy {
                s.editor = Editor::Closed;
            }
        });
    }

    /// Create or update depending on the open editor; true when saved
    ///
    /// On success the editor closes and the list reloads from page 1.
    /// On failure the editor stays open so the user can retry.
    pub async fn save(&self, payload: ItemPayload) -> bool {
        let Some(_busy) = self.begin_busy() else {
            return false;
        };
        let editing = self.lock().editor.item().cloned();

        let result = match &editing {
            Some(item) => self.api.update(&item.id, &payload.into()).await.map(|_| "Item updated"),
            None => self.api.create(&payload).await.map(|_| "Item created"),
        };

        match result {
            Ok(message) => {
                self.notifier.notify(Notification::success(message));
                let page_changed = self.update(|s| {
                    s.editor = Editor::Closed;
                    s.filter.set_page(1)
                });
                log::debug!("[LIST] {} (page reset: {})", message, page_changed);
                self.refresh().await;
                true
            }
            Err(err) => {
                self.notify_error(&err, "Save failed");
                false
            }
        }
    }

    // ========================
    // Delete
    // ========================

    /// Ask for confirmation before deleting `item`
    pub fn request_delete(&self, item: Item) {
        self.update(|s| s.pending_delete = Some(item));
    }

    pub fn cancel_delete(&self) {
        self.update(|s| s.pending_delete = None);
    }

    /// Delete the item awaiting confirmation, then reload the current page
    pub async fn confirm_delete(&self) -> bool {
        let Some(_busy) = self.begin_busy() else {
            return false;
        };
        let Some(item) = self.update(|s| s.pending_delete.take()) else {
            return false;
        };

        match self.api.delete(&item.id).await {
            Ok(()) => {
                self.notifier.notify(Notification::success("Item deleted"));
                self.refresh().await;
                true
            }
            Err(err) => {
                self.notify_error(&err, "Delete failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResult, ListQuery};
    use crate::models::{ItemPage, ItemPatch, ItemStatus};
    use crate::notify::NotificationKind;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::task::{Context, Poll};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List(ListQuery),
        Create(ItemPayload),
        Update(String, ItemPatch),
        Delete(String),
    }

    enum ListReply {
        Ready(ApiResult<ItemPage>),
        Deferred(oneshot::Receiver<ApiResult<ItemPage>>),
    }

    #[derive(Default)]
    struct ScriptedApi {
        lists: Mutex<VecDeque<ListReply>>,
        mutations: Mutex<VecDeque<ApiResult<()>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl ScriptedApi {
        fn reply_list(&self, reply: ApiResult<ItemPage>) {
            self.lists.lock().unwrap().push_back(ListReply::Ready(reply));
        }

        fn defer_list(&self) -> oneshot::Sender<ApiResult<ItemPage>> {
            let (tx, rx) = oneshot::channel();
            self.lists.lock().unwrap().push_back(ListReply::Deferred(rx));
            tx
        }

        fn reply_mutation(&self, reply: ApiResult<()>) {
            self.mutations.lock().unwrap().push_back(reply);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn next_mutation(&self) -> ApiResult<()> {
            self.mutations.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }

    #[async_trait(?Send)]
    impl ItemApi for Arc<ScriptedApi> {
        async fn list(&self, query: &ListQuery) -> ApiResult<ItemPage> {
            self.calls.lock().unwrap().push(Call::List(query.clone()));
            let reply = self.lists.lock().unwrap().pop_front();
            match reply {
                Some(ListReply::Ready(result)) => result,
                Some(ListReply::Deferred(rx)) => rx.await.unwrap_or_else(|_| Err(ApiError::Network("dropped".into()))),
                None => Ok(page_of(&[], query.page)),
            }
        }

        async fn create(&self, payload: &ItemPayload) -> ApiResult<Item> {
            self.calls.lock().unwrap().push(Call::Create(payload.clone()));
            self.next_mutation().map(|_| item("new"))
        }

        async fn update(&self, id: &str, patch: &ItemPatch) -> ApiResult<Item> {
            self.calls.lock().unwrap().push(Call::Update(id.to_string(), patch.clone()));
            self.next_mutation().map(|_| item(id))
        }

        async fn delete(&self, id: &str) -> ApiResult<()> {
            self.calls.lock().unwrap().push(Call::Delete(id.to_string()));
            self.next_mutation()
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        fn seen(&self) -> Vec<Notification> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Notifier for Arc<RecordingNotifier> {
        fn notify(&self, notification: Notification) {
            self.seen.lock().unwrap().push(notification);
        }
    }

    /// Returns Pending once so sibling futures in a join get polled
    struct YieldNow(bool);

    impl Future for YieldNow {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    fn item(id: &str) -> Item {
        Item {
            id: id.to_string(),
            title: format!("Item {}", id),
            description: None,
            category: None,
            price: 1.0,
            quantity: 1,
            tags: vec![],
            status: ItemStatus::Active,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
        }
    }

    fn page_of(ids: &[&str], page: u32) -> ItemPage {
        ItemPage {
            items: ids.iter().map(|id| item(id)).collect(),
            meta: PaginatedMeta { page, limit: 10, total: 30, total_pages: 3 },
        }
    }

    fn payload(title: &str) -> ItemPayload {
        ItemPayload {
            title: title.to_string(),
            description: None,
            category: None,
            price: 2.5,
            quantity: 4,
            tags: vec!["x".to_string()],
            status: ItemStatus::Active,
        }
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    type TestController = ListController<Arc<ScriptedApi>, Arc<RecordingNotifier>>;

    fn setup() -> (TestController, Arc<ScriptedApi>, Arc<RecordingNotifier>) {
        let api = Arc::new(ScriptedApi::default());
        let notes = Arc::new(RecordingNotifier::default());
        (ListController::new(api.clone(), notes.clone()), api, notes)
    }

    /// Controller already showing page `page` with items `a`, `b`
    fn loaded_on(page: u32) -> (TestController, Arc<ScriptedApi>, Arc<RecordingNotifier>) {
        let (ctrl, api, notes) = setup();
        api.reply_list(Ok(page_of(&["a", "b"], page)));
        block_on(async {
            ctrl.update(|s| s.filter.set_page(page));
            ctrl.refresh().await;
        });
        (ctrl, api, notes)
    }

    #[test]
    fn test_refresh_replaces_items_and_meta() {
        let (ctrl, api, notes) = setup();
        api.reply_list(Ok(page_of(&["a", "b"], 1)));

        block_on(ctrl.refresh());

        let snap = ctrl.snapshot();
        assert_eq!(ids(&snap.items), ["a", "b"]);
        assert_eq!(snap.meta.unwrap().total_pages, 3);
        assert!(!snap.loading);
        assert!(notes.seen().is_empty());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_page() {
        let (ctrl, api, notes) = loaded_on(1);
        api.reply_list(Err(ApiError::Http { status: 500, message: "Database offline".into() }));

        block_on(ctrl.set_page(2));

        let snap = ctrl.snapshot();
        assert_eq!(ids(&snap.items), ["a", "b"]);
        assert_eq!(snap.meta.unwrap().page, 1);
        assert_eq!(snap.filter.page, 1);
        assert!(!snap.loading);
        assert_eq!(notes.seen(), vec![Notification::error("Database offline")]);
    }

    #[test]
    fn test_page_change_can_be_retried_after_failure() {
        let (ctrl, api, notes) = loaded_on(1);
        api.reply_list(Err(ApiError::Network("connection reset".into())));
        block_on(ctrl.set_page(2));
        let before = api.calls().len();

        let next = ctrl.snapshot().meta.unwrap().page + 1;
        api.reply_list(Ok(page_of(&["c", "d"], 2)));
        block_on(ctrl.set_page(next));

        assert_eq!(api.calls().len(), before + 1);
        assert!(matches!(api.calls().last(), Some(Call::List(q)) if q.page == 2));
        let snap = ctrl.snapshot();
        assert_eq!(ids(&snap.items), ["c", "d"]);
        assert_eq!(snap.filter.page, 2);
        assert_eq!(notes.seen().len(), 1);
    }

    #[test]
    fn test_filter_change_can_be_retried_after_failure() {
        let (ctrl, api, _notes) = loaded_on(1);
        let archived = StatusFilter::Only(ItemStatus::Archived);
        api.reply_list(Err(ApiError::Http { status: 503, message: "Unavailable".into() }));
        block_on(ctrl.set_status(archived));
        assert_eq!(ctrl.snapshot().filter.status, StatusFilter::All);
        let before = api.calls().len();

        block_on(ctrl.set_status(archived));

        assert_eq!(api.calls().len(), before + 1);
        assert!(matches!(api.calls().last(), Some(Call::List(q)) if q.status == Some(ItemStatus::Archived)));
        assert_eq!(ctrl.snapshot().filter.status, archived);
    }

    #[test]
    fn test_blank_error_message_uses_fallback() {
        let (ctrl, api, notes) = setup();
        api.reply_list(Err(ApiError::Http { status: 502, message: String::new() }));

        block_on(ctrl.refresh());

        assert_eq!(notes.seen(), vec![Notification::error("Failed to load items")]);
    }

    #[test]
    fn test_superseded_fetch_is_discarded() {
        let (ctrl, api, notes) = setup();
        let reply_a = api.defer_list();
        let reply_b = api.defer_list();

        block_on(async {
            let fetch_a = ctrl.refresh();
            let fetch_b = ctrl.set_page(2);
            let resolve = async {
                reply_b.send(Ok(page_of(&["b1"], 2))).unwrap();
                YieldNow(false).await;
                reply_a.send(Ok(page_of(&["a1"], 1))).unwrap();
            };
            futures::join!(fetch_a, fetch_b, resolve);
        });

        let snap = ctrl.snapshot();
        assert_eq!(ids(&snap.items), ["b1"]);
        assert_eq!(snap.meta.unwrap().page, 2);
        assert_eq!(snap.filter.page, 2);
        assert!(!snap.loading);
        assert!(notes.seen().is_empty());
    }

    #[test]
    fn test_superseded_failure_is_silent() {
        let (ctrl, api, notes) = setup();
        let reply_a = api.defer_list();
        let reply_b = api.defer_list();

        block_on(async {
            let fetch_a = ctrl.refresh();
            let fetch_b = ctrl.set_status(StatusFilter::Only(ItemStatus::Archived));
            let resolve = async {
                reply_b.send(Ok(page_of(&["b1"], 1))).unwrap();
                YieldNow(false).await;
                reply_a.send(Err(ApiError::Network("timeout".into()))).unwrap();
            };
            futures::join!(fetch_a, fetch_b, resolve);
        });

        assert_eq!(ids(&ctrl.snapshot().items), ["b1"]);
        assert!(notes.seen().is_empty());
    }

    #[test]
    fn test_loading_held_until_latest_settles() {
        let (ctrl, api, _notes) = setup();
        let reply_a = api.defer_list();
        let reply_b = api.defer_list();

        block_on(async {
            let fetch_a = ctrl.refresh();
            let fetch_b = ctrl.set_page(2);
            let resolve = async {
                reply_a.send(Ok(page_of(&["a1"], 1))).unwrap();
                YieldNow(false).await;
                assert!(ctrl.snapshot().loading);
                assert!(ctrl.snapshot().items.is_empty());
                reply_b.send(Ok(page_of(&["b1"], 2))).unwrap();
            };
            futures::join!(fetch_a, fetch_b, resolve);
        });

        assert!(!ctrl.snapshot().loading);
    }

    #[test]
    fn test_filter_change_requests_first_page() {
        let (ctrl, api, _notes) = loaded_on(3);

        block_on(ctrl.set_search("widget"));
        block_on(ctrl.set_limit(20));

        let calls = api.calls();
        let Some(Call::List(query)) = calls.last() else {
            panic!("expected a list call, got {:?}", calls);
        };
        assert_eq!(query.search.as_deref(), Some("widget"));
        assert_eq!((query.page, query.limit), (1, 20));
    }

    #[test]
    fn test_unchanged_filter_skips_fetch() {
        let (ctrl, api, _notes) = loaded_on(1);
        let before = api.calls().len();

        block_on(ctrl.set_status(StatusFilter::All));
        block_on(ctrl.set_page(1));

        assert_eq!(api.calls().len(), before);
    }

    #[test]
    fn test_snapshots_never_split_items_and_meta() {
        let api = Arc::new(ScriptedApi::default());
        let seen = Arc::new(Mutex::new(Vec::<ListSnapshot>::new()));
        let sink = seen.clone();
        let ctrl = ListController::new(api.clone(), Arc::new(RecordingNotifier::default()))
            .with_listener(move |snap| sink.lock().unwrap().push(snap.clone()));
        api.reply_list(Ok(page_of(&["a"], 1)));

        block_on(ctrl.refresh());

        let seen = seen.lock().unwrap();
        assert!(seen.iter().any(|s| s.loading));
        assert!(seen.iter().all(|s| s.items.is_empty() == s.meta.is_none()));
        assert_eq!(seen.last(), Some(&ctrl.snapshot()));
    }

    #[test]
    fn test_create_closes_editor_and_reloads_first_page() {
        let (ctrl, api, notes) = loaded_on(3);
        ctrl.open_create();

        let saved = block_on(ctrl.save(payload("Widget")));

        assert!(saved);
        let snap = ctrl.snapshot();
        assert_eq!(snap.editor, Editor::Closed);
        assert_eq!(snap.filter.page, 1);
        assert!(!snap.busy);
        assert_eq!(notes.seen(), vec![Notification::success("Item created")]);

        let calls = api.calls();
        assert_eq!(calls[calls.len() - 2], Call::Create(payload("Widget")));
        assert!(matches!(&calls[calls.len() - 1], Call::List(q) if q.page == 1));
    }

    #[test]
    fn test_update_sends_patch_for_edited_item() {
        let (ctrl, api, notes) = loaded_on(2);
        ctrl.open_edit(item("b"));

        assert!(block_on(ctrl.save(payload("Renamed"))));

        assert!(api.calls().contains(&Call::Update("b".into(), payload("Renamed").into())));
        assert_eq!(notes.seen(), vec![Notification::success("Item updated")]);
        assert_eq!(ctrl.snapshot().filter.page, 1);
    }

    #[test]
    fn test_failed_save_keeps_editor_open() {
        let (ctrl, api, notes) = loaded_on(2);
        ctrl.open_edit(item("a"));
        api.reply_mutation(Err(ApiError::Http { status: 422, message: "Title taken".into() }));
        let before = api.calls().len();

        let saved = block_on(ctrl.save(payload("Clash")));

        assert!(!saved);
        let snap = ctrl.snapshot();
        assert_eq!(snap.editor, Editor::Editing(item("a")));
        assert_eq!(snap.filter.page, 2);
        assert!(!snap.busy);
        assert_eq!(notes.seen(), vec![Notification::error("Title taken")]);
        // The update itself, no reload
        assert_eq!(api.calls().len(), before + 1);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (ctrl, api, _notes) = loaded_on(1);
        ctrl.request_delete(item("a"));
        ctrl.cancel_delete();

        assert!(!block_on(ctrl.confirm_delete()));
        assert!(!api.calls().iter().any(|c| matches!(c, Call::Delete(_))));
    }

    #[test]
    fn test_confirmed_delete_reloads_current_page() {
        let (ctrl, api, notes) = loaded_on(2);
        ctrl.request_delete(item("b"));

        assert!(block_on(ctrl.confirm_delete()));

        let deletes: Vec<_> = api.calls().into_iter().filter(|c| matches!(c, Call::Delete(_))).collect();
        assert_eq!(deletes, vec![Call::Delete("b".into())]);
        assert!(matches!(api.calls().last(), Some(Call::List(q)) if q.page == 2));
        let snap = ctrl.snapshot();
        assert_eq!(snap.pending_delete, None);
        assert!(!snap.busy);
        assert_eq!(notes.seen(), vec![Notification::success("Item deleted")]);
    }

    #[test]
    fn test_failed_delete_leaves_list_unchanged() {
        let (ctrl, api, notes) = loaded_on(1);
        api.reply_mutation(Err(ApiError::NotFound("Item not found".into())));
        ctrl.request_delete(item("a"));
        let before = api.calls().len();

        assert!(!block_on(ctrl.confirm_delete()));

        assert_eq!(api.calls().len(), before + 1);
        let snap = ctrl.snapshot();
        assert_eq!(ids(&snap.items), ["a", "b"]);
        assert!(!snap.busy);
        assert_eq!(notes.seen().len(), 1);
        assert_eq!(notes.seen()[0].kind, NotificationKind::Error);
        assert_eq!(notes.seen()[0].message, "Item not found");
    }

    #[test]
    fn test_busy_blocks_second_mutation() {
        let (ctrl, api, _notes) = setup();
        ctrl.update(|s| s.busy = true);
        ctrl.open_create();

        assert!(!block_on(ctrl.save(payload("Twice"))));
        assert!(api.calls().is_empty());
        ctrl.close_editor();
        assert!(ctrl.snapshot().editor.is_open());
    }
}
