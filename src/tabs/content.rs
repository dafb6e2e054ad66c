//! The paging content surface.
//!
//! One viewport-wide page per tab, in tab order. Scroll events set the
//! fractional index to `offset / viewport_width`. Reactions on that index
//! request mounts and change notifications; a reaction on the viewport width
//! schedules the resize correction. All of these go through the
//! [`UiSender`] and are applied by the interactive context.

use tokio::time::Instant;

use crate::config::TabsConfig;
use crate::geometry::Region;
use crate::reactive::{Scope, UiSender};
use crate::render::strip::Strip;
use crate::widget::lifecycle::{LifecycleEvent, MountTracker};
use crate::widget::scroll::ScrollSurface;
use crate::widget::traits::Widget;

use super::state::TabState;
use super::UiTask;

/// Horizontally paging pager with lazily mounted pages.
pub struct ScrollableContent {
    state: TabState,
    mounts: MountTracker,
    pages: Vec<Option<Box<dyn Widget>>>,
    _scope: Scope,
}

impl ScrollableContent {
    /// Attach a paging surface to `state.scroll` and install the reactions.
    pub fn new(state: &TabState, tx: UiSender<UiTask>, config: &TabsConfig) -> Self {
        let count = state.tab_count();
        let width = state.viewport_width.get_untracked();
        state.scroll.attach(
            ScrollSurface::new(width, width * count as f64)
                .paging(true)
                .with_motion(config.motion()),
        );

        let active_index = state.active_index;
        let viewport_width = state.viewport_width;

        let mut scope = Scope::new();
        let mount_tx = tx.clone();
        scope.reaction(
            move || active_index.get(),
            move |&index, previous| {
                mount_tx.send(UiTask::Mount(index));
                if previous.is_some() {
                    mount_tx.send(UiTask::NotifyChange(index));
                }
            },
        );

        let settle_delay = config.settle_delay;
        scope.reaction(
            move || (viewport_width.get(), active_index.get()),
            move |&(width, _), previous| {
                let Some(&(previous_width, previous_index)) = previous else {
                    return;
                };
                if width != previous_width {
                    let offset = previous_index as f64 * width;
                    tracing::debug!(
                        previous_width,
                        width,
                        previous_index,
                        "scheduling resize correction"
                    );
                    tx.send_after(
                        settle_delay,
                        UiTask::ScrollContent {
                            offset,
                            animated: true,
                        },
                    );
                }
            },
        );

        Self {
            state: state.clone(),
            mounts: MountTracker::new(count),
            pages: (0..count).map(|_| None).collect(),
            _scope: scope,
        }
    }

    /// Scroll event: set the fractional index from `offset`.
    ///
    /// Ignored while the viewport has no width.
    pub fn on_scroll(&self, offset: f64) {
        let width = self.state.viewport_width.get_untracked();
        if width <= 0.0 {
            tracing::trace!(offset, "scroll event without viewport width");
            return;
        }
        self.state.fractional_index.set(offset / width);
    }

    /// Advance the surface to `now` and deliver its scroll event, if any.
    pub fn frame(&self, now: Instant) {
        if let Some(Some(offset)) = self.state.scroll.with(|s| s.tick(now)) {
            self.on_scroll(offset);
        }
    }

    /// Gesture move to absolute offset `x`.
    pub fn drag_to(&self, x: f64) {
        self.state.scroll.with(|s| s.drag_to(x));
    }

    /// Gesture end: snap to the nearest page.
    pub fn release(&self) {
        self.state.scroll.with(ScrollSurface::release);
    }

    /// New viewport width: resize the surface, then publish the width.
    ///
    /// The offset is only re-clamped against the final range, so a valid
    /// page offset survives a wider viewport untouched.
    pub fn resize(&self, width: f64) {
        let count = self.state.tab_count() as f64;
        self.state.scroll.with(|s| s.set_widths(width, width * count));
        self.state.viewport_width.set(width);
    }

    /// Mount the page at `position`, creating its widget. Returns `true` on
    /// the first mount only.
    pub fn mount(&mut self, position: usize) -> bool {
        if !self.mounts.mount(position) {
            return false;
        }
        let tab = &self.state.tabs[position];
        tracing::debug!(position, title = %tab.title, "mounting tab content");
        self.pages[position] = tab.content.as_ref().map(|factory| factory());
        true
    }

    pub fn is_mounted(&self, position: usize) -> bool {
        self.mounts.is_mounted(position)
    }

    pub fn mounted_positions(&self) -> Vec<usize> {
        self.mounts.mounted_positions()
    }

    /// Drain mount events recorded since the last call.
    pub fn drain_lifecycle(&mut self) -> Vec<LifecycleEvent> {
        self.mounts.pending_events()
    }

    /// The page widget at `position`, if mounted and non-empty.
    pub fn page(&self, position: usize) -> Option<&dyn Widget> {
        self.pages.get(position)?.as_deref()
    }

    pub fn offset(&self) -> f64 {
        self.state.scroll.offset().unwrap_or(0.0)
    }

    /// Where the surface will come to rest.
    pub fn target(&self) -> f64 {
        self.state.scroll.with(|s| s.target()).unwrap_or(0.0)
    }

    pub fn is_animating(&self) -> bool {
        self.state
            .scroll
            .with(|s| s.is_animating() || s.has_pending_event())
            .unwrap_or(false)
    }

    /// Render mounted pages that intersect `region`. Unmounted pages are
    /// blank.
    pub fn render(&self, region: Region) -> Vec<Strip> {
        if region.is_empty() {
            return Vec::new();
        }

        let offset = self.offset();
        let width = region.width;
        let mut strips = Vec::new();

        for (position, page) in self.pages.iter().enumerate() {
            let Some(widget) = page else { continue };
            let page_x = region.x + (position as f64 * f64::from(width) - offset).round() as i32;
            let page_region = Region::new(page_x, region.y, width, region.height);
            let visible = page_region.intersection(region);
            if visible.is_empty() {
                continue;
            }
            strips.extend(
                widget
                    .render(page_region)
                    .iter()
                    .map(|s| s.crop(visible.x, visible.right()))
                    .filter(|s| s.width() > 0),
            );
        }
        strips
    }
}

impl Drop for ScrollableContent {
    fn drop(&mut self) {
        self.state.scroll.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::UiQueue;
    use crate::tabs::state::Tab;
    use crate::widgets::Text;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn tabs() -> Vec<Tab> {
        vec![
            Tab::new("A", || Text::new("alpha")),
            Tab::new("B", || Text::new("beta")),
            Tab::empty("C"),
        ]
    }

    fn setup(width: f64) -> (TabState, ScrollableContent, UiQueue<UiTask>) {
        let state = TabState::provide(tabs()).with_viewport_width(width);
        let queue = UiQueue::new();
        let content = ScrollableContent::new(&state, queue.sender(), &TabsConfig::default());
        (state, content, queue)
    }

    #[test]
    fn attaches_paging_surface() {
        let (state, _content, _queue) = setup(300.0);
        assert!(state.scroll.is_attached());
        assert_eq!(state.scroll.with(|s| s.max_offset()), Some(600.0));
        assert_eq!(state.scroll.with(|s| s.is_paging()), Some(true));
    }

    #[test]
    fn initial_mount_request_for_first_tab() {
        let (_state, _content, mut queue) = setup(300.0);
        assert_eq!(queue.drain(Instant::now()), vec![UiTask::Mount(0)]);
    }

    #[test]
    fn scroll_sets_fractional_index() {
        let (state, content, _queue) = setup(300.0);
        content.on_scroll(150.0);
        assert_eq!(state.fractional_index.get_untracked(), 0.5);
        content.on_scroll(300.0);
        assert_eq!(state.fractional_index.get_untracked(), 1.0);
        assert_eq!(state.active_index.get_untracked(), 1);
    }

    #[test]
    fn zero_width_scroll_ignored() {
        let (state, content, _queue) = setup(0.0);
        content.on_scroll(120.0);
        assert_eq!(state.fractional_index.get_untracked(), 0.0);
    }

    #[test]
    fn index_change_requests_mount_and_notification() {
        let (_state, content, mut queue) = setup(300.0);
        let t0 = Instant::now();
        queue.drain(t0);

        content.on_scroll(100.0);
        assert!(queue.drain(t0).is_empty());

        content.on_scroll(200.0);
        assert_eq!(
            queue.drain(t0),
            vec![UiTask::Mount(1), UiTask::NotifyChange(1)]
        );
    }

    #[test]
    fn mount_is_monotonic() {
        let (_state, mut content, _queue) = setup(300.0);
        assert!(content.mount(1));
        assert!(!content.mount(1));
        assert!(!content.mount(9));
        assert!(content.is_mounted(1));
        assert!(content.page(1).is_some());

        assert!(content.mount(2));
        assert!(content.page(2).is_none());
        assert_eq!(content.mounted_positions(), vec![1, 2]);
        assert_eq!(
            content.drain_lifecycle(),
            vec![
                LifecycleEvent::Mount { position: 1 },
                LifecycleEvent::Mount { position: 2 }
            ]
        );
    }

    #[test]
    fn resize_schedules_correction_with_previous_index() {
        let (_state, content, mut queue) = setup(300.0);
        let t0 = Instant::now();
        content.on_scroll(300.0);
        queue.drain(t0);

        content.resize(600.0);
        assert!(queue.drain(t0).is_empty());
        assert_eq!(queue.pending_timers(), 1);
        assert!(queue.drain(t0 + Duration::from_millis(49)).is_empty());
        assert_eq!(
            queue.drain(t0 + Duration::from_millis(50)),
            vec![UiTask::ScrollContent {
                offset: 600.0,
                animated: true
            }]
        );
    }

    #[test]
    fn same_width_schedules_nothing() {
        let (_state, content, mut queue) = setup(300.0);
        content.resize(300.0);
        let tasks = queue.drain(Instant::now());
        assert_eq!(tasks, vec![UiTask::Mount(0)]);
        assert_eq!(queue.pending_timers(), 0);
    }

    #[test]
    fn frame_delivers_scroll_events() {
        let (state, content, _queue) = setup(300.0);
        content.drag_to(450.0);
        content.frame(Instant::now());
        assert_eq!(state.fractional_index.get_untracked(), 1.5);
    }

    #[test]
    fn release_snaps_to_page() {
        let (_state, content, _queue) = setup(300.0);
        content.drag_to(420.0);
        content.release();
        assert_eq!(content.target(), 300.0);
        assert!(content.is_animating());
    }

    #[test]
    fn render_only_mounted_pages_in_view() {
        let (state, mut content, _queue) = setup(10.0);
        content.mount(0);
        content.mount(1);

        let region = Region::new(0, 3, 10, 2);
        let strips = content.render(region);
        assert_eq!(strips.len(), 1);
        assert_eq!((strips[0].x_offset, strips[0].y), (0, 3));
        assert_eq!(strips[0].text(), "alpha");

        state.scroll.scroll_to(7.0, false);
        let texts: Vec<(i32, String)> = content
            .render(region)
            .iter()
            .map(|s| (s.x_offset, s.text()))
            .collect();
        assert_eq!(texts, vec![(3, "beta".to_owned())]);
    }

    #[test]
    fn drop_detaches_handle() {
        let (state, content, _queue) = setup(300.0);
        drop(content);
        assert!(!state.scroll.is_attached());
    }
}
