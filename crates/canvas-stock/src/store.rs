//! Application store
//!
//! Holds the selected stock and the layout toggles. The store is an injected,
//! cloneable handle; every clone observes the same state.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Currently selected stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSelection {
    pub code: String,
    pub name: Option<String>,
}

/// Visibility of the canvas and the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutState {
    pub canvas_open: bool,
    pub sidebar_open: bool,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            canvas_open: false,
            sidebar_open: true,
        }
    }
}

struct Inner {
    selection: watch::Sender<Option<StockSelection>>,
    layout: watch::Sender<LayoutState>,
}

/// Shared selection and layout state
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<Inner>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore {
    pub fn new() -> Self {
        let (selection, _) = watch::channel(None);
        let (layout, _) = watch::channel(LayoutState::default());
        Self {
            inner: Arc::new(Inner { selection, layout }),
        }
    }

    /// Select a stock
    ///
    /// The stock code is the identity of a selection. Selecting the code that
    /// is already selected notifies nobody and returns `false`; a new name for
    /// it is stored silently.
    pub fn select_stock(&self, code: impl Into<String>, name: Option<String>) -> bool {
        let code = code.into();
        self.inner.selection.send_if_modified(|current| {
            if let Some(selected) = current.as_mut().filter(|s| s.code == code) {
                if name.is_some() {
                    selected.name = name;
                }
                return false;
            }
            debug!(%code, "stock selected");
            *current = Some(StockSelection { code, name });
            true
        })
    }

    pub fn clear_selection(&self) -> bool {
        self.inner.selection.send_if_modified(|current| current.take().is_some())
    }

    pub fn selection(&self) -> Option<StockSelection> {
        self.inner.selection.borrow().clone()
    }

    pub fn subscribe_selection(&self) -> watch::Receiver<Option<StockSelection>> {
        self.inner.selection.subscribe()
    }

    pub fn layout(&self) -> LayoutState {
        *self.inner.layout.borrow()
    }

    pub fn subscribe_layout(&self) -> watch::Receiver<LayoutState> {
        self.inner.layout.subscribe()
    }

    pub fn open_canvas(&self) {
        self.inner.layout.send_if_modified(|layout| {
            let changed = !layout.canvas_open;
            layout.canvas_open = true;
            changed
        });
    }

    pub fn toggle_canvas(&self) -> bool {
        let mut open = false;
        self.inner.layout.send_modify(|layout| {
            layout.canvas_open = !layout.canvas_open;
            open = layout.canvas_open;
        });
        open
    }

    pub fn toggle_sidebar(&self) -> bool {
        let mut open = false;
        self.inner.layout.send_modify(|layout| {
            layout.sidebar_open = !layout.sidebar_open;
            open = layout.sidebar_open;
        });
        open
    }
}
