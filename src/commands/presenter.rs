//! List Presenter
//!
//! Publishes the bookmark list as observable state and turns the host's
//! list-view intents (add, edit, delete, open) into store operations.
//! After any mutation it revalidates: the list is re-read from the store,
//! never patched locally.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{DomainResult, Item, ItemList};
use crate::repository::{ItemRepository, Repository};
use super::editor::{ItemEditor, OnComplete};
use super::host::{HostContext, Route};

/// What the list view observes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    /// At least one fetch is in flight
    pub is_loading: bool,
    /// The first fetch has finished (successfully or not)
    pub loaded: bool,
    pub items: ItemList,
}

/// Guidance shown instead of an empty list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyView {
    pub title: &'static str,
    pub description: &'static str,
    pub action: Route,
}

impl Default for EmptyView {
    fn default() -> Self {
        Self {
            title: "No bookmarks yet",
            description: "Add a bookmark to open it from here",
            action: Route::CreateForm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScreen {
    Loading,
    Empty(EmptyView),
    Items(ItemList),
}

impl ListState {
    pub fn screen(&self) -> ListScreen {
        if !self.loaded {
            ListScreen::Loading
        } else if self.items.is_empty() {
            ListScreen::Empty(EmptyView::default())
        } else {
            ListScreen::Items(self.items.clone())
        }
    }
}

pub struct ListPresenter {
    repo: ItemRepository,
    host: HostContext,
    default_icon: String,
    state: watch::Sender<ListState>,
    /// Fetches started and not yet finished
    fetches: AtomicUsize,
}

impl ListPresenter {
    /// The initial state is loading; call `revalidate` to perform the first fetch
    pub fn new(repo: ItemRepository, host: HostContext, default_icon: impl Into<String>) -> Arc<Self> {
        let (state, _) = watch::channel(ListState {
            is_loading: true,
            ..ListState::default()
        });
        Arc::new(Self {
            repo,
            host,
            default_icon: default_icon.into(),
            state,
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ListState {
        self.state.borrow().clone()
    }

    /// Re-read the list from the store.
    ///
    /// On failure the previous items stay on screen and a failure toast is shown.
    /// Overlapping calls keep `is_loading` set until the last one finishes.
    pub async fn revalidate(&self) -> DomainResult<()> {
        self.state.send_modify(|s| {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            s.is_loading = true;
        });

        let result = self.repo.list().await;
        // The counter only moves under the state lock, so the last finisher clears the flag
        self.state.send_modify(|s| {
            let still_running = self.fetches.fetch_sub(1, Ordering::SeqCst) > 1;
            s.is_loading = still_running;
            s.loaded = true;
            if let Ok(items) = &result {
                s.items = ItemList::from(items.clone());
            }
        });

        match result {
            Ok(items) => {
                log::debug!("Revalidated list: {} items", items.len());
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load bookmarks: {}", e);
                self.host.notify_failure("Failed to load bookmarks", &e);
                Err(e)
            }
        }
    }

    /// Open the create form; the returned editor revalidates this list when done
    pub fn on_add(self: &Arc<Self>) -> ItemEditor {
        self.host.navigator.push(Route::CreateForm);
        ItemEditor::create(self.repo.clone(), self.host.clone(), self.default_icon.clone())
            .on_complete(self.clone())
    }

    /// Open the edit form pre-filled with `item`
    pub fn on_edit(self: &Arc<Self>, item: &Item) -> ItemEditor {
        self.host.navigator.push(Route::EditForm { id: item.id.clone() });
        ItemEditor::update(self.repo.clone(), self.host.clone(), item.clone())
            .on_complete(self.clone())
    }

    /// Delete by id against freshly loaded state.
    ///
    /// An id that is no longer present saves the list unchanged and still
    /// counts as success. Returns whether an item was removed.
    pub async fn on_delete(&self, id: &str) -> DomainResult<bool> {
        match self.repo.delete(&id.to_string()).await {
            Ok(removed) => {
                let _ = self.revalidate().await;
                self.host.notify_success("Bookmark deleted");
                Ok(removed)
            }
            Err(e) => {
                log::error!("Failed to delete bookmark {}: {}", id, e);
                self.host.notify_failure("Failed to delete bookmark", &e);
                Err(e)
            }
        }
    }

    /// Hand the item's url to the host's link opener, unvalidated
    pub fn on_open(&self, item: &Item) -> DomainResult<()> {
        self.host.opener.open(&item.url).inspect_err(|e| {
            log::warn!("Failed to open {}: {}", item.url, e);
            self.host.notify_failure("Failed to open bookmark", e);
        })
    }
}

#[async_trait]
impl OnComplete for ListPresenter {
    async fn on_complete(&self) {
        // Failures are already reported by revalidate
        let _ = self.revalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::editor::SubmitOutcome;
    use crate::commands::host::ToastStyle;
    use crate::commands::testing::{fixture, fixture_with, Fixture, NavEvent, SlowKv};
    use crate::domain::ItemFields;
    use crate::repository::MemoryKv;

    fn presenter(f: &Fixture<MemoryKv>) -> Arc<ListPresenter> {
        ListPresenter::new(f.repo.clone(), f.host.clone(), "globe")
    }

    async fn seed(f: &Fixture<MemoryKv>, ids: &[&str]) {
        let items: Vec<Item> = ids
            .iter()
            .map(|id| Item::new(id.to_string(), ItemFields::new(format!("Item {}", id), "https://x.test", "globe")))
            .collect();
        f.store.save(&ItemList::from(items)).await.unwrap();
    }

    fn ids(state: &ListState) -> Vec<String> {
        state.items.iter().map(|i| i.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_empty_store_shows_empty_state() {
        let f = fixture();
        let p = presenter(&f);
        assert_eq!(p.snapshot().screen(), ListScreen::Loading);

        p.revalidate().await.unwrap();

        let state = p.snapshot();
        assert!(!state.is_loading);
        match state.screen() {
            ListScreen::Empty(view) => assert_eq!(view.action, Route::CreateForm),
            other => panic!("expected empty state, got {:?}", other),
        }
        assert!(f.recorder.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_loading_flag_while_fetch_in_flight() {
        let f = fixture_with(Arc::new(SlowKv::new()));
        let p = ListPresenter::new(f.repo.clone(), f.host.clone(), "globe");
        p.revalidate().await.unwrap();

        let (result, seen_loading) = tokio::join!(p.revalidate(), async { p.snapshot().is_loading });

        assert!(result.is_ok());
        assert!(seen_loading);
        assert!(!p.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_overlapping_revalidates_keep_loading_until_last_finishes() {
        let f = fixture_with(Arc::new(SlowKv::new()));
        let p = ListPresenter::new(f.repo.clone(), f.host.clone(), "globe");

        async fn loading_after_revalidate(p: &ListPresenter) -> bool {
            p.revalidate().await.unwrap();
            p.snapshot().is_loading
        }
        let (first, second) = tokio::join!(loading_after_revalidate(&p), loading_after_revalidate(&p));

        // Whichever finished first saw the other still loading
        let mut seen = vec![first, second];
        seen.sort();
        assert_eq!(seen, vec![false, true]);
        assert!(!p.snapshot().is_loading);
        assert!(p.snapshot().loaded);
    }

    #[tokio::test]
    async fn test_subscribers_observe_revalidate() {
        let f = fixture();
        seed(&f, &["1", "2"]).await;
        let p = presenter(&f);
        let mut rx = p.subscribe();

        p.revalidate().await.unwrap();

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(ids(&state), vec!["1", "2"]);
        assert!(matches!(state.screen(), ListScreen::Items(_)));
    }

    #[tokio::test]
    async fn test_add_flow_revalidates() {
        let f = fixture();
        let p = presenter(&f);
        p.revalidate().await.unwrap();

        let editor = p.on_add();
        assert_eq!(editor.initial_values().icon, "globe");
        let outcome = editor
            .submit(ItemFields::new("Docs", "https://x.test", "globe"))
            .await;

        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        let state = p.snapshot();
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items.iter().next().unwrap().title, "Docs");
        assert_eq!(
            f.recorder.nav_events(),
            vec![NavEvent::Push(Route::CreateForm), NavEvent::Pop]
        );
        assert_eq!(f.recorder.toasts()[0].style, ToastStyle::Success);
    }

    #[tokio::test]
    async fn test_edit_flow_preserves_identity() {
        let f = fixture();
        f.store
            .save(&ItemList::from(vec![Item::new(
                "1".to_string(),
                ItemFields::new("Old", "u1", "i1"),
            )]))
            .await
            .unwrap();
        let p = presenter(&f);
        p.revalidate().await.unwrap();

        let target = p.snapshot().items.get("1").cloned().unwrap();
        let editor = p.on_edit(&target);
        assert_eq!(editor.initial_values(), ItemFields::new("Old", "u1", "i1"));
        editor.submit(ItemFields::new("New", "u2", "i2")).await;

        let state = p.snapshot();
        assert_eq!(state.items.len(), 1);
        assert_eq!(
            state.items.get("1"),
            Some(&Item::new("1".to_string(), ItemFields::new("New", "u2", "i2")))
        );
        assert_eq!(
            f.recorder.nav_events()[0],
            NavEvent::Push(Route::EditForm { id: "1".to_string() })
        );
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let f = fixture();
        seed(&f, &["1", "2", "3"]).await;
        let p = presenter(&f);
        p.revalidate().await.unwrap();

        assert!(p.on_delete("2").await.unwrap());

        assert_eq!(ids(&p.snapshot()), vec!["1", "3"]);
        assert_eq!(f.recorder.toast_titles(), vec!["Bookmark deleted"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_silent_noop() {
        let f = fixture();
        seed(&f, &["1", "2"]).await;
        let p = presenter(&f);
        p.revalidate().await.unwrap();
        let writes = f.kv.write_count();

        assert!(!p.on_delete("gone").await.unwrap());

        assert_eq!(f.kv.write_count(), writes + 1);
        assert_eq!(ids(&p.snapshot()), vec!["1", "2"]);
        assert_eq!(f.recorder.toasts()[0].style, ToastStyle::Success);
    }

    #[tokio::test]
    async fn test_delete_uses_fresh_state_not_view() {
        let f = fixture();
        seed(&f, &["1", "2"]).await;
        let p = presenter(&f);
        p.revalidate().await.unwrap();

        // Another flow adds an item the presenter has not seen yet
        seed(&f, &["1", "2", "3"]).await;
        p.on_delete("1").await.unwrap();

        assert_eq!(ids(&p.snapshot()), vec!["2", "3"]);
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_view() {
        let f = fixture();
        seed(&f, &["1"]).await;
        let p = presenter(&f);
        p.revalidate().await.unwrap();
        f.kv.set_unavailable(true);

        assert!(p.on_delete("1").await.is_err());

        assert_eq!(ids(&p.snapshot()), vec!["1"]);
        let toasts = f.recorder.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].style, ToastStyle::Failure);
        assert_eq!(toasts[0].title, "Failed to delete bookmark");
    }

    #[tokio::test]
    async fn test_revalidate_failure_keeps_previous_items() {
        let f = fixture();
        seed(&f, &["1"]).await;
        let p = presenter(&f);
        p.revalidate().await.unwrap();
        f.kv.set_unavailable(true);

        assert!(p.revalidate().await.is_err());

        let state = p.snapshot();
        assert!(!state.is_loading);
        assert_eq!(ids(&state), vec!["1"]);
        assert_eq!(f.recorder.toast_titles(), vec!["Failed to load bookmarks"]);
    }

    #[tokio::test]
    async fn test_open_hands_url_verbatim() {
        let f = fixture();
        let p = presenter(&f);
        let item = Item::new("1".to_string(), ItemFields::new("Odd", "not a url &x", "globe"));

        p.on_open(&item).unwrap();
        assert_eq!(f.recorder.opened(), vec!["not a url &x"]);

        f.recorder.set_fail_open(true);
        assert!(p.on_open(&item).is_err());
        assert_eq!(f.recorder.toast_titles(), vec!["Failed to open bookmark"]);
    }
}
