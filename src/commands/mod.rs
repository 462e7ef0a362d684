//! Commands Layer
//!
//! Orchestration the host UI invokes: the list presenter and the item
//! editor, talking to the host through the collaborator traits in `host`.

mod editor;
mod host;
mod presenter;

#[cfg(test)]
mod testing;

pub use editor::{EditorMode, ItemEditor, OnComplete, SubmitOutcome};
pub use host::{HostContext, LinkOpener, Navigator, Notifier, Route, SystemOpener, Toast, ToastStyle};
pub use presenter::{EmptyView, ListPresenter, ListScreen, ListState};
