//! TabView: the composed pager and its interactive-context loop.
//!
//! [`TabView`] owns the shared [`TabState`], both components, the
//! [`UiQueue`] their reactions feed, and the key bindings. Each frame the
//! content surface is ticked (the animation side) and then the queue is
//! pumped (the interactive side). [`TabView::run`] drives that from a live
//! terminal; tests drive it through [`Pilot`](crate::testing::Pilot).

use std::time::Duration;

use crossterm::event;
use tokio::time::Instant;

use crate::config::TabsConfig;
use crate::error::{Result, TabsError};
use crate::event::binding::{BindingAction, KeyBindingRegistry};
use crate::event::input::{from_crossterm, InputEvent, MouseAction, MouseEvent};
use crate::geometry::{Region, Size};
use crate::reactive::UiQueue;
use crate::render::compositor::Compositor;
use crate::render::driver::Driver;
use crate::tabs::{ScrollableContent, ScrollableTabBar, Tab, TabState, UiTask};
use crate::widget::lifecycle::LifecycleEvent;

/// An in-progress content drag.
#[derive(Debug, Clone, Copy)]
struct Drag {
    start_x: i32,
    start_offset: f64,
}

/// Tab bar on top, paging content below.
pub struct TabView {
    state: TabState,
    content: ScrollableContent,
    bar: ScrollableTabBar,
    queue: UiQueue<UiTask>,
    bindings: KeyBindingRegistry,
    config: TabsConfig,
    size: Size,
    drag: Option<Drag>,
    running: bool,
}

impl TabView {
    /// Build a view for `tabs` at `size`.
    pub fn new(tabs: Vec<Tab>, size: Size, config: TabsConfig) -> Result<Self> {
        Self::with_state(TabState::provide(tabs), size, config)
    }

    /// Build a view around an existing state, e.g. one with a change
    /// callback. The state's viewport width is set from `size`.
    pub fn with_state(state: TabState, size: Size, config: TabsConfig) -> Result<Self> {
        if size.width <= 0 {
            return Err(TabsError::InvalidViewport(size.width));
        }
        state.viewport_width.set(f64::from(size.width));

        let queue = UiQueue::new();
        let content = ScrollableContent::new(&state, queue.sender(), &config);
        let bar = ScrollableTabBar::new(&state, &config);
        bar.measure()?;

        Ok(Self {
            state,
            content,
            bar,
            queue,
            bindings: KeyBindingRegistry::with_defaults(),
            config,
            size,
            drag: None,
            running: true,
        })
    }

    /// Replace the key bindings (builder).
    pub fn with_bindings(mut self, bindings: KeyBindingRegistry) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn state(&self) -> &TabState {
        &self.state
    }

    pub fn content(&self) -> &ScrollableContent {
        &self.content
    }

    pub fn tab_bar(&self) -> &ScrollableTabBar {
        &self.bar
    }

    pub fn config(&self) -> &TabsConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn active_index(&self) -> usize {
        self.state.active_index.get_untracked()
    }

    pub fn fractional_index(&self) -> f64 {
        self.state.fractional_index.get_untracked()
    }

    /// Tasks or timers still waiting for the interactive context.
    pub fn pending_timers(&self) -> usize {
        self.queue.pending_timers()
    }

    /// Whether anything is still moving or scheduled.
    pub fn is_busy(&self) -> bool {
        self.content.is_animating() || self.queue.pending_timers() > 0
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }

    pub fn request_quit(&mut self) {
        self.running = false;
    }

    /// `(bar, content)` regions for the current size.
    pub fn regions(&self) -> (Region, Region) {
        self.size
            .to_region()
            .split_top(i32::from(self.config.bar_height))
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Press the label at `position`.
    pub fn press(&self, position: usize) -> Result<()> {
        self.bar.press(position)
    }

    /// Gesture drag of the content to absolute offset `x`.
    pub fn drag_to(&self, x: f64) {
        self.content.drag_to(x);
    }

    /// Gesture release of the content.
    pub fn release(&self) {
        self.content.release();
    }

    /// New terminal size. Re-measures the labels and arms the resize
    /// correction relative to `now`.
    pub fn resize(&mut self, size: Size, now: Instant) -> Result<()> {
        if size.width <= 0 {
            return Err(TabsError::InvalidViewport(size.width));
        }
        tracing::debug!(width = size.width, height = size.height, "viewport resized");
        self.size = size;
        self.content.resize(f64::from(size.width));
        self.bar.measure()?;
        self.pump(now);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------

    /// One frame: tick the content surface, then run ready UI tasks.
    pub fn frame(&mut self, now: Instant) {
        self.content.frame(now);
        self.pump(now);
    }

    /// Apply every task that is ready at `now`.
    pub fn pump(&mut self, now: Instant) {
        for task in self.queue.drain(now) {
            match task {
                UiTask::Mount(position) => {
                    self.content.mount(position);
                }
                UiTask::ScrollContent { offset, animated } => {
                    tracing::debug!(offset, animated, "applying resize correction");
                    self.state.scroll.scroll_to(offset, animated);
                }
                UiTask::NotifyChange(index) => self.state.notify_change(index),
            }
        }
    }

    /// Mount events since the last call.
    pub fn drain_lifecycle(&mut self) -> Vec<LifecycleEvent> {
        self.content.drain_lifecycle()
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Handle one input event. Rejected commands are logged and dropped.
    pub fn handle_input(&mut self, input: InputEvent, now: Instant) {
        match input {
            InputEvent::Key(key) => {
                if let Some(action) = self.bindings.lookup(&key) {
                    self.apply_binding(action);
                }
            }
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
            InputEvent::Resize { width, height } => {
                let size = Size::new(i32::from(width), i32::from(height));
                if let Err(err) = self.resize(size, now) {
                    tracing::debug!(%err, "resize ignored");
                }
            }
        }
    }

    fn apply_binding(&mut self, action: BindingAction) {
        let count = self.state.tab_count();
        let active = self.active_index();
        let target = match action {
            BindingAction::Quit => {
                self.request_quit();
                return;
            }
            BindingAction::PreviousTab => active.saturating_sub(1),
            BindingAction::NextTab => (active + 1).min(count.saturating_sub(1)),
            BindingAction::FirstTab => 0,
            BindingAction::LastTab => count.saturating_sub(1),
            BindingAction::SelectTab(position) => position,
        };
        if let Err(err) = self.press(target) {
            tracing::debug!(%err, "tab press ignored");
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (bar, content) = self.regions();
        let (x, y) = (i32::from(mouse.x), i32::from(mouse.y));

        match mouse.kind {
            MouseAction::Down if bar.contains(x, y) => {
                if let Some(position) = self.bar.hit_test(f64::from(x - bar.x)) {
                    if let Err(err) = self.press(position) {
                        tracing::debug!(%err, "tab press ignored");
                    }
                }
            }
            MouseAction::Down if content.contains(x, y) => {
                self.drag = Some(Drag {
                    start_x: x,
                    start_offset: self.content.offset(),
                });
            }
            MouseAction::Drag => {
                if let Some(drag) = self.drag {
                    self.drag_to(drag.start_offset - f64::from(x - drag.start_x));
                }
            }
            MouseAction::Up => {
                if self.drag.take().is_some() {
                    self.release();
                }
            }
            MouseAction::ScrollLeft | MouseAction::ScrollUp => {
                self.apply_binding(BindingAction::PreviousTab);
            }
            MouseAction::ScrollRight | MouseAction::ScrollDown => {
                self.apply_binding(BindingAction::NextTab);
            }
            MouseAction::Down => {}
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Render the whole view into a fresh screen buffer.
    pub fn render(&self) -> Compositor {
        let mut frame = Compositor::for_size(self.size);
        let (bar, content) = self.regions();
        frame.place_strips(&self.bar.render(bar), bar);
        frame.place_strips(&self.content.render(content), content);
        frame
    }

    /// Run against a live terminal until a quit binding fires.
    pub async fn run(mut self, driver: &mut Driver) -> Result<()> {
        driver.enter()?;
        let result = self.run_loop(driver).await;
        driver.leave()?;
        result
    }

    async fn run_loop(&mut self, driver: &mut Driver) -> Result<()> {
        let mut ticker = tokio::time::interval(self.config.frame_interval);
        let mut previous = Compositor::new(0, 0);

        while self.running {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.queue.wait_due() => {}
            }
            let now = Instant::now();

            while event::poll(Duration::ZERO)? {
                if let Some(input) = from_crossterm(event::read()?) {
                    self.handle_input(input, now);
                }
            }
            if !self.running {
                break;
            }

            self.frame(now);
            let frame = self.render();
            driver.draw(&frame.diff(&previous))?;
            previous = frame;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::input::{Key, KeyEvent};
    use crate::widgets::Text;
    use pretty_assertions::assert_eq;

    fn tabs() -> Vec<Tab> {
        ["A", "B", "C"]
            .into_iter()
            .map(|t| Tab::new(t, move || Text::new(format!("page {t}"))))
            .collect()
    }

    fn view() -> TabView {
        TabView::new(tabs(), Size::new(30, 6), TabsConfig::default()).unwrap()
    }

    fn settle(view: &mut TabView, start: Instant) -> Instant {
        let mut now = start;
        for _ in 0..100 {
            view.frame(now);
            if !view.is_busy() {
                break;
            }
            now += view.config().frame_interval;
        }
        now
    }

    #[test]
    fn rejects_empty_viewport() {
        let err = TabView::new(tabs(), Size::new(0, 5), TabsConfig::default()).err();
        assert!(matches!(err, Some(TabsError::InvalidViewport(0))));
    }

    #[test]
    fn first_frame_mounts_first_tab() {
        let mut view = view();
        view.frame(Instant::now());
        assert_eq!(view.content().mounted_positions(), vec![0]);
        assert_eq!(
            view.drain_lifecycle(),
            vec![LifecycleEvent::Mount { position: 0 }]
        );
    }

    #[test]
    fn press_animates_to_page() {
        let mut view = view();
        let t0 = Instant::now();
        view.press(2).unwrap();
        settle(&mut view, t0);
        assert_eq!(view.fractional_index(), 2.0);
        assert_eq!(view.active_index(), 2);
        assert!(view.content().is_mounted(2));
    }

    #[test]
    fn keys_navigate_and_quit() {
        let mut view = view();
        let t0 = Instant::now();
        view.handle_input(InputEvent::Key(KeyEvent::plain(Key::Right)), t0);
        let t1 = settle(&mut view, t0);
        assert_eq!(view.active_index(), 1);

        view.handle_input(InputEvent::Key(KeyEvent::plain(Key::End)), t1);
        let t2 = settle(&mut view, t1);
        assert_eq!(view.active_index(), 2);

        view.handle_input(InputEvent::Key(KeyEvent::plain(Key::Right)), t2);
        settle(&mut view, t2);
        assert_eq!(view.active_index(), 2);

        view.handle_input(InputEvent::Key(KeyEvent::plain(Key::Char('q'))), t2);
        assert!(view.should_quit());
    }

    #[test]
    fn click_on_label_presses_it() {
        let mut view = view();
        let t0 = Instant::now();
        view.handle_input(
            InputEvent::Mouse(MouseEvent {
                kind: MouseAction::Down,
                x: 25,
                y: 1,
            }),
            t0,
        );
        settle(&mut view, t0);
        assert_eq!(view.active_index(), 2);
    }

    #[test]
    fn drag_and_release_snaps() {
        let mut view = view();
        let t0 = Instant::now();
        let at = |kind, x| {
            InputEvent::Mouse(MouseEvent { kind, x, y: 4 })
        };
        view.handle_input(at(MouseAction::Down, 20), t0);
        view.handle_input(at(MouseAction::Drag, 2), t0);
        assert_eq!(view.content().offset(), 18.0);
        view.handle_input(at(MouseAction::Up, 2), t0);
        settle(&mut view, t0);
        assert_eq!(view.content().offset(), 30.0);
        assert_eq!(view.active_index(), 1);
    }

    #[test]
    fn zero_width_resize_is_ignored() {
        let mut view = view();
        view.handle_input(InputEvent::Resize { width: 0, height: 4 }, Instant::now());
        assert_eq!(view.size(), Size::new(30, 6));
    }

    #[test]
    fn dropping_view_frees_runtime_slots() {
        let before = crate::reactive::signal::live_slots();
        let mut view = view();
        view.press(1).unwrap();
        settle(&mut view, Instant::now());
        assert_ne!(crate::reactive::signal::live_slots(), before);

        drop(view);
        assert_eq!(crate::reactive::signal::live_slots(), before);
    }

    #[test]
    fn render_shows_bar_and_page() {
        let mut view = view();
        view.frame(Instant::now());
        let frame = view.render();
        assert_eq!(frame.row_text(1).trim_end(), "    A         B         C");
        assert_eq!(frame.row_text(2).trim_end(), "━━━━━━━━━━");
        assert_eq!(frame.row_text(3).trim_end(), "page A");
    }
}
