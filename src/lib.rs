//! # swipe-tabs
//!
//! A swipeable tabbed pager for terminal UIs.
//!
//! A row of tab labels sits above a horizontally paging content area. The
//! content scroll position drives a continuous *fractional index*; the tab
//! bar reads it to slide and stretch an underline between labels, keep the
//! active label centered, and emphasize the active label. Pages mount lazily
//! the first time they become active.
//!
//! ## Core Systems
//!
//! - **[`tabs`]**: Shared tab state, the content pager, the tab bar
//! - **[`reactive`]**: Shared values, derived values, reactions, UI-task queue
//! - **[`animation`]**: Interpolation tables and easing curves
//! - **[`widget`]**: Widget trait, mount tracking, scroll surfaces
//! - **[`widgets`]**: Built-in page content ([`widgets::Text`])
//! - **[`event`]**: Input events and key bindings
//! - **[`render`]**: Strip-based compositor and crossterm driver
//! - **[`view`]**: [`TabView`] tying everything together
//! - **[`testing`]**: Headless pilot and snapshot helpers
//! - **[`geometry`]**: Size and Region primitives
//!
//! ## Quick start
//!
//! ```no_run
//! use swipe_tabs::{Tab, TabView, TabsConfig};
//! use swipe_tabs::geometry::Size;
//! use swipe_tabs::render::Driver;
//! use swipe_tabs::widgets::Text;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> swipe_tabs::Result<()> {
//!     let tabs = vec![
//!         Tab::new("Overview", || Text::new("overview page")),
//!         Tab::new("Details", || Text::new("details page")),
//!     ];
//!     let size = Driver::terminal_size()?;
//!     let view = TabView::new(tabs, size, TabsConfig::default())?;
//!     let mut driver = Driver::new();
//!     view.run(&mut driver).await
//! }
//! ```

// Foundation
pub mod error;
pub mod geometry;

// Reactivity and motion
pub mod animation;
pub mod reactive;

// Widget system
pub mod widget;
pub mod widgets;

// Events
pub mod event;

// Rendering
pub mod render;

// Tabs
pub mod config;
pub mod tabs;
pub mod view;

pub mod testing;

pub use config::TabsConfig;
pub use error::{Result, TabsError};
pub use tabs::{ScrollableContent, ScrollableTabBar, Tab, TabState};
pub use view::TabView;
