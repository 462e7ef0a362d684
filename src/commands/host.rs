//! Host Collaborators
//!
//! What the embedding launcher provides: transient toasts, a navigation
//! stack and a link opener. The orchestration layer only talks to these
//! traits; the host decides how they render.

use std::sync::Arc;

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastStyle {
    Success,
    Failure,
}

/// Transient, non-blocking notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub style: ToastStyle,
    pub title: String,
    pub message: Option<String>,
}

impl Toast {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            style: ToastStyle::Success,
            title: title.into(),
            message: None,
        }
    }

    pub fn failure(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            style: ToastStyle::Failure,
            title: title.into(),
            message: Some(message.into()),
        }
    }
}

/// Views the host can push onto its navigation stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    CreateForm,
    EditForm { id: String },
}

pub trait Notifier: Send + Sync {
    fn show_toast(&self, toast: Toast);
}

pub trait Navigator: Send + Sync {
    fn push(&self, route: Route);
    /// Return to the previous view
    fn pop(&self);
}

pub trait LinkOpener: Send + Sync {
    /// Hand `url` to the platform as-is
    fn open(&self, url: &str) -> DomainResult<()>;
}

/// Opens links with the platform's default handler
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> DomainResult<()> {
        open::that(url).map_err(|e| DomainError::Host(format!("Failed to open {}: {}", url, e)))
    }
}

/// Host services shared by the presenter and every editor it opens
#[derive(Clone)]
pub struct HostContext {
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub opener: Arc<dyn LinkOpener>,
}

impl HostContext {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        opener: Arc<dyn LinkOpener>,
    ) -> Self {
        Self {
            notifier,
            navigator,
            opener,
        }
    }

    pub fn notify_success(&self, title: &str) {
        self.notifier.show_toast(Toast::success(title));
    }

    pub fn notify_failure(&self, title: &str, error: &DomainError) {
        self.notifier.show_toast(Toast::failure(title, error.to_string()));
    }
}
