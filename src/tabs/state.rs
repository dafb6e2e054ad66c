//! The shared tab state both pager components read.
//!
//! Built once with [`TabState::provide`] and handed explicitly to
//! [`ScrollableContent`](super::ScrollableContent) and
//! [`ScrollableTabBar`](super::ScrollableTabBar). Clones share everything.

use std::fmt;
use std::rc::Rc;

use crate::reactive::{Derived, Scope, SharedValue};
use crate::widget::scroll::ScrollHandle;
use crate::widget::traits::{Widget, WidgetFactory};

// ---------------------------------------------------------------------------
// Tab
// ---------------------------------------------------------------------------

/// One tab: a title and an optional content factory.
///
/// A tab is identified by its position in the list. Titles may repeat.
#[derive(Clone)]
pub struct Tab {
    pub title: String,
    pub content: Option<WidgetFactory>,
}

impl Tab {
    /// A tab whose page renders `content` once mounted.
    pub fn new<W, F>(title: impl Into<String>, content: F) -> Self
    where
        W: Widget + 'static,
        F: Fn() -> W + 'static,
    {
        let factory: WidgetFactory = Rc::new(move || Box::new(content()) as Box<dyn Widget>);
        Self {
            title: title.into(),
            content: Some(factory),
        }
    }

    /// A tab with an empty page.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
        }
    }
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("title", &self.title)
            .field("content", &self.content.is_some())
            .finish()
    }
}

/// Nearest tab position for a fractional index, rounding half away from zero.
///
/// Non-finite and negative inputs map to 0.
pub fn round_index(fractional: f64) -> usize {
    if !fractional.is_finite() || fractional <= 0.0 {
        return 0;
    }
    fractional.round() as usize
}

// ---------------------------------------------------------------------------
// TabState
// ---------------------------------------------------------------------------

/// Callback invoked on the interactive context when the active tab changes.
pub type OnTabChange = Rc<dyn Fn(usize)>;

/// Fractional index, tab list, viewport width and the content scroll handle.
///
/// `fractional_index` is written by the content pager's scroll handler;
/// programmatic scrolls reach it only through the scroll handle.
#[derive(Clone)]
pub struct TabState {
    pub fractional_index: SharedValue<f64>,
    pub viewport_width: SharedValue<f64>,
    /// `round_index(fractional_index)`, notifying only on change.
    pub active_index: Derived<usize>,
    pub tabs: Rc<[Tab]>,
    pub scroll: ScrollHandle,
    on_change: Option<OnTabChange>,
    /// Frees the shared values once the last clone is dropped.
    _scope: Rc<Scope>,
}

impl TabState {
    /// Build the state for `tabs`. The scroll handle starts detached and the
    /// viewport width at zero.
    pub fn provide(tabs: Vec<Tab>) -> Self {
        let mut scope = Scope::new();
        let fractional_index = scope.shared(0.0_f64);
        let viewport_width = scope.shared(0.0_f64);
        let active_index = scope.derived(move || round_index(fractional_index.get()));
        Self {
            fractional_index,
            viewport_width,
            active_index,
            tabs: tabs.into(),
            scroll: ScrollHandle::new(),
            on_change: None,
            _scope: Rc::new(scope),
        }
    }

    /// Set the initial viewport width (builder).
    pub fn with_viewport_width(self, width: f64) -> Self {
        self.viewport_width.set(width);
        self
    }

    /// Register a tab-change callback (builder).
    pub fn with_on_change(mut self, f: impl Fn(usize) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Invoke the change callback, if any. Interactive context only.
    pub fn notify_change(&self, index: usize) {
        tracing::debug!(index, "active tab changed");
        if let Some(callback) = &self.on_change {
            callback(index);
        }
    }
}

impl fmt::Debug for TabState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabState")
            .field("fractional_index", &self.fractional_index.get_untracked())
            .field("viewport_width", &self.viewport_width.get_untracked())
            .field("tabs", &self.tabs)
            .field("scroll", &self.scroll)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
