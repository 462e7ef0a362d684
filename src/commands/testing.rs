//! Test doubles for the host collaborators and the store backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{DomainError, DomainResult};
use crate::repository::{ItemRepository, ItemStore, KeyValueStore, MemoryKv};
use super::host::{HostContext, LinkOpener, Navigator, Notifier, Route, Toast};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Push(Route),
    Pop,
}

/// Records everything the orchestration layer asks the host to do
#[derive(Default)]
pub struct Recorder {
    toasts: Mutex<Vec<Toast>>,
    nav: Mutex<Vec<NavEvent>>,
    opened: Mutex<Vec<String>>,
    fail_open: AtomicBool,
}

impl Recorder {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn toast_titles(&self) -> Vec<String> {
        self.toasts().into_iter().map(|t| t.title).collect()
    }

    pub fn nav_events(&self) -> Vec<NavEvent> {
        self.nav.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }
}

impl Notifier for Recorder {
    fn show_toast(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

impl Navigator for Recorder {
    fn push(&self, route: Route) {
        self.nav.lock().unwrap().push(NavEvent::Push(route));
    }

    fn pop(&self) {
        self.nav.lock().unwrap().push(NavEvent::Pop);
    }
}

impl LinkOpener for Recorder {
    fn open(&self, url: &str) -> DomainResult<()> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(DomainError::Host("no handler for url".to_string()));
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// `MemoryKv` that yields to the scheduler before every read, so a
/// concurrently polled future gets a turn mid-sequence.
#[derive(Default)]
pub struct SlowKv {
    inner: MemoryKv,
}

impl SlowKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for SlowKv {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        tokio::task::yield_now().await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        self.inner.set(key, value).await
    }
}

pub struct Fixture<K> {
    pub kv: Arc<K>,
    pub store: ItemStore,
    pub repo: ItemRepository,
    pub host: HostContext,
    pub recorder: Arc<Recorder>,
}

pub fn fixture() -> Fixture<MemoryKv> {
    fixture_with(Arc::new(MemoryKv::new()))
}

pub fn fixture_with<K: KeyValueStore + 'static>(kv: Arc<K>) -> Fixture<K> {
    let store = ItemStore::new(kv.clone());
    let recorder = Arc::new(Recorder::default());
    let host = HostContext::new(recorder.clone(), recorder.clone(), recorder.clone());
    Fixture {
        kv,
        repo: ItemRepository::new(store.clone()),
        store,
        host,
        recorder,
    }
}
