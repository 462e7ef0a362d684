//! Item Editor
//!
//! The create/update form flow. The host renders the form from
//! `initial_values` and calls `submit`; the editor validates, writes through
//! the repository, reports via toasts and closes itself on success.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DomainError, Item, ItemFields};
use crate::repository::{ItemRepository, Repository};
use super::host::HostContext;

/// Called after a successful submit, before the form closes
#[async_trait]
pub trait OnComplete: Send + Sync {
    async fn on_complete(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    /// Editing this item; its id is kept
    Update(Item),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved(Item),
    /// Rejected before touching the store
    Invalid(DomainError),
    /// The store failed; the form stays open for a retry
    Failed(DomainError),
    /// Another submit was still in flight
    Ignored,
}

pub struct ItemEditor {
    mode: EditorMode,
    repo: ItemRepository,
    host: HostContext,
    default_icon: String,
    completion: Option<Arc<dyn OnComplete>>,
    in_flight: AtomicBool,
}

impl ItemEditor {
    pub fn create(repo: ItemRepository, host: HostContext, default_icon: impl Into<String>) -> Self {
        Self::with_mode(EditorMode::Create, repo, host, default_icon.into())
    }

    pub fn update(repo: ItemRepository, host: HostContext, item: Item) -> Self {
        let icon = item.icon.clone();
        Self::with_mode(EditorMode::Update(item), repo, host, icon)
    }

    fn with_mode(mode: EditorMode, repo: ItemRepository, host: HostContext, default_icon: String) -> Self {
        Self {
            mode,
            repo,
            host,
            default_icon,
            completion: None,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn on_complete(mut self, completion: Arc<dyn OnComplete>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Form pre-fill: blank with the default icon, or the item's current fields
    pub fn initial_values(&self) -> ItemFields {
        match &self.mode {
            EditorMode::Create => ItemFields::new("", "", self.default_icon.clone()),
            EditorMode::Update(item) => item.fields(),
        }
    }

    /// True while a submit is in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit(&self, values: ItemFields) -> SubmitOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            log::debug!("Ignoring submit while another one is in flight");
            return SubmitOutcome::Ignored;
        };

        if let Err(e) = values.validate() {
            self.host.notify_failure("Empty field", &e);
            return SubmitOutcome::Invalid(e);
        }

        let result = match &self.mode {
            EditorMode::Create => self.repo.create(values).await,
            EditorMode::Update(item) => self
                .repo
                .update(&item.id, values.clone())
                .await
                // Removed meanwhile: the unchanged list was saved, last writer wins
                .map(|updated| updated.unwrap_or_else(|| item.overlay(values))),
        };

        match result {
            Ok(item) => {
                self.host.notify_success(self.success_title());
                if let Some(completion) = &self.completion {
                    completion.on_complete().await;
                }
                self.host.navigator.pop();
                SubmitOutcome::Saved(item)
            }
            Err(e) => {
                log::error!("{}: {}", self.failure_title(), e);
                self.host.notify_failure(self.failure_title(), &e);
                SubmitOutcome::Failed(e)
            }
        }
    }

    fn success_title(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Bookmark added",
            EditorMode::Update(_) => "Bookmark updated",
        }
    }

    fn failure_title(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Failed to add bookmark",
            EditorMode::Update(_) => "Failed to update bookmark",
        }
    }
}

/// Holds the in-flight flag; releasing it on drop clears the loading state
/// on every exit path.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
