//! The tabbed pager: shared state, content pager, tab bar.
//!
//! - [`TabState`]: fractional index, tabs, viewport width, scroll handle.
//! - [`ScrollableContent`]: paging surface with lazily mounted pages.
//! - [`ScrollableTabBar`]: labels, underline, auto-centering.

pub mod content;
pub mod label_layout;
pub mod state;
pub mod tab_bar;

pub use content::ScrollableContent;
pub use state::{round_index, OnTabChange, Tab, TabState};
pub use tab_bar::{
    centering_offset, InterpolationTables, LayoutEntry, LayoutMap, ScrollableTabBar, Underline,
};

/// Work that reactions hand to the interactive context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiTask {
    /// Mount the page at this position.
    Mount(usize),
    /// Programmatic scroll of the content surface.
    ScrollContent { offset: f64, animated: bool },
    /// Report a new active tab to the change callback.
    NotifyChange(usize),
}
