//! Pilot: drive a [`TabView`] headlessly on a virtual clock.
//!
//! Time only moves when the test says so. [`Pilot::advance`] runs one frame
//! per frame interval, so animations and deferred tasks behave exactly as in
//! the live loop but deterministically.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::TabsConfig;
use crate::error::Result;
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseEvent};
use crate::geometry::Size;
use crate::tabs::{Tab, TabState};
use crate::view::TabView;
use crate::widget::lifecycle::LifecycleEvent;

use super::snapshot::view_to_string;

/// Upper bound on frames run by [`Pilot::settle`].
const SETTLE_LIMIT: usize = 1_000;

/// A headless view plus its clock.
pub struct Pilot {
    view: TabView,
    now: Instant,
}

impl Pilot {
    /// A view of `tabs` at `width` x `height` with default config.
    pub fn new(tabs: Vec<Tab>, width: i32, height: i32) -> Result<Self> {
        Self::with_config(tabs, width, height, TabsConfig::default())
    }

    pub fn with_config(tabs: Vec<Tab>, width: i32, height: i32, config: TabsConfig) -> Result<Self> {
        Self::with_state(TabState::provide(tabs), width, height, config)
    }

    /// Drive a pre-built state, e.g. one carrying a change callback.
    pub fn with_state(state: TabState, width: i32, height: i32, config: TabsConfig) -> Result<Self> {
        let view = TabView::with_state(state, Size::new(width, height), config)?;
        let mut pilot = Self {
            view,
            now: Instant::now(),
        };
        pilot.view.frame(pilot.now);
        Ok(pilot)
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Press a label programmatically.
    pub fn press(&mut self, position: usize) -> Result<()> {
        self.view.press(position)
    }

    /// Send a key with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.press_key_with(key, Modifiers::NONE);
    }

    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.input(InputEvent::Key(KeyEvent::new(key, modifiers)));
    }

    /// Left click at (x, y).
    pub fn click(&mut self, x: u16, y: u16) {
        self.mouse(MouseAction::Down, x, y);
        self.mouse(MouseAction::Up, x, y);
    }

    /// Drag across the content from `from_x` to `to_x` on row `y`, then
    /// release.
    pub fn swipe(&mut self, from_x: u16, to_x: u16, y: u16) {
        self.mouse(MouseAction::Down, from_x, y);
        self.mouse(MouseAction::Drag, to_x, y);
        self.mouse(MouseAction::Up, to_x, y);
    }

    /// Terminal resize.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.input(InputEvent::Resize { width, height });
    }

    fn mouse(&mut self, kind: MouseAction, x: u16, y: u16) {
        self.input(InputEvent::Mouse(MouseEvent { kind, x, y }));
    }

    fn input(&mut self, event: InputEvent) {
        self.view.handle_input(event, self.now);
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Move the clock forward by `by`, running a frame every frame interval
    /// and one at the end.
    pub fn advance(&mut self, by: Duration) {
        let step = self.view.config().frame_interval.max(Duration::from_millis(1));
        let end = self.now + by;
        while self.now + step < end {
            self.now += step;
            self.view.frame(self.now);
        }
        self.now = end;
        self.view.frame(self.now);
    }

    /// Advance frame by frame until nothing is animating or scheduled.
    pub fn settle(&mut self) {
        let step = self.view.config().frame_interval;
        for _ in 0..SETTLE_LIMIT {
            if !self.view.is_busy() {
                return;
            }
            self.advance(step);
        }
        tracing::warn!("pilot did not settle");
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn view(&self) -> &TabView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TabView {
        &mut self.view
    }

    pub fn active_index(&self) -> usize {
        self.view.active_index()
    }

    pub fn fractional_index(&self) -> f64 {
        self.view.fractional_index()
    }

    pub fn content_offset(&self) -> f64 {
        self.view.content().offset()
    }

    /// Where the content surface is heading.
    pub fn content_target(&self) -> f64 {
        self.view.content().target()
    }

    pub fn mounted(&self) -> Vec<usize> {
        self.view.content().mounted_positions()
    }

    pub fn drain_lifecycle(&mut self) -> Vec<LifecycleEvent> {
        self.view.drain_lifecycle()
    }

    pub fn should_quit(&self) -> bool {
        self.view.should_quit()
    }

    /// The current frame as text.
    pub fn render(&self) -> String {
        view_to_string(&self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Text;

    fn tabs() -> Vec<Tab> {
        vec![
            Tab::new("One", || Text::new("first")),
            Tab::new("Two", || Text::new("second")),
        ]
    }

    #[test]
    fn starts_on_first_tab() {
        let pilot = Pilot::new(tabs(), 20, 4).unwrap();
        assert_eq!(pilot.active_index(), 0);
        assert_eq!(pilot.mounted(), vec![0]);
    }

    #[test]
    fn advance_moves_clock() {
        let mut pilot = Pilot::new(tabs(), 20, 4).unwrap();
        let start = pilot.now();
        pilot.advance(Duration::from_millis(40));
        assert_eq!(pilot.now() - start, Duration::from_millis(40));
    }

    #[test]
    fn settle_finishes_animation() {
        let mut pilot = Pilot::new(tabs(), 20, 4).unwrap();
        pilot.press(1).unwrap();
        pilot.settle();
        assert_eq!(pilot.content_offset(), 20.0);
        assert_eq!(pilot.fractional_index(), 1.0);
        assert!(!pilot.view().is_busy());
    }

    #[test]
    fn quit_key() {
        let mut pilot = Pilot::new(tabs(), 20, 4).unwrap();
        pilot.press_key(Key::Escape);
        assert!(pilot.should_quit());
    }
}
