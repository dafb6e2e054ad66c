//! Horizontal scroll surface and the shared handle used to drive it.
//!
//! [`ScrollSurface`] is the scroll primitive both pager components sit on:
//! gesture drags move it directly, programmatic scrolls either jump or
//! animate, and [`ScrollSurface::tick`] reports offset changes as scroll
//! events at most once per frame interval while an animation runs.
//!
//! [`ScrollHandle`] is an optional, shared attachment to a surface. Scrolling
//! through a detached handle does nothing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tokio::time::Instant;

use crate::animation::Easing;
use crate::error::{Result, TabsError};

// ---------------------------------------------------------------------------
// ScrollMotion
// ---------------------------------------------------------------------------

/// Timing of animated scrolls and scroll-event throttling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMotion {
    pub duration: Duration,
    pub easing: Easing,
    pub frame_interval: Duration,
}

impl Default for ScrollMotion {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(250),
            easing: Easing::CubicOut,
            frame_interval: Duration::from_millis(16),
        }
    }
}

// ---------------------------------------------------------------------------
// ScrollSurface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct ActiveScroll {
    from: f64,
    to: f64,
    /// Set by the first tick after the scroll was requested.
    started: Option<Instant>,
}

/// A horizontally scrollable strip of content.
///
/// The offset is always within `[0, max_offset]`.
#[derive(Debug, Clone)]
pub struct ScrollSurface {
    offset: f64,
    viewport_width: f64,
    content_width: f64,
    paging: bool,
    motion: ScrollMotion,
    animation: Option<ActiveScroll>,
    /// Offset changed since the last reported scroll event.
    dirty: bool,
    last_event: Option<Instant>,
}

impl ScrollSurface {
    /// Create a surface at offset zero.
    pub fn new(viewport_width: f64, content_width: f64) -> Self {
        Self {
            offset: 0.0,
            viewport_width: viewport_width.max(0.0),
            content_width: content_width.max(0.0),
            paging: false,
            motion: ScrollMotion::default(),
            animation: None,
            dirty: false,
            last_event: None,
        }
    }

    /// Snap to whole viewport pages on [`release`](Self::release) (builder).
    pub fn paging(mut self, enabled: bool) -> Self {
        self.paging = enabled;
        self
    }

    /// Set animation and throttling parameters (builder).
    pub fn with_motion(mut self, motion: ScrollMotion) -> Self {
        self.motion = motion;
        self
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Where the surface will come to rest.
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map_or(self.offset, |a| a.to)
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    pub fn is_paging(&self) -> bool {
        self.paging
    }

    /// `max(0, content_width - viewport_width)`.
    pub fn max_offset(&self) -> f64 {
        (self.content_width - self.viewport_width).max(0.0)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether a scroll event is waiting to be reported.
    pub fn has_pending_event(&self) -> bool {
        self.dirty
    }

    /// Programmatic scroll to `x`, clamped to the valid range.
    ///
    /// Replaces any running animation. Animated scrolls start moving on the
    /// next [`tick`](Self::tick).
    pub fn scroll_to(&mut self, x: f64, animated: bool) {
        let target = self.clamp(x);
        if !animated || self.motion.duration.is_zero() {
            self.animation = None;
            self.jump(target);
            return;
        }
        if (target - self.offset).abs() < f64::EPSILON {
            self.animation = None;
            return;
        }
        self.animation = Some(ActiveScroll {
            from: self.offset,
            to: target,
            started: None,
        });
    }

    /// Gesture-driven move. Cancels any running animation.
    pub fn drag_to(&mut self, x: f64) {
        self.animation = None;
        let x = self.clamp(x);
        self.jump(x);
    }

    /// End of a gesture. With paging enabled, animate to the nearest page.
    pub fn release(&mut self) {
        if !self.paging || self.viewport_width <= 0.0 {
            return;
        }
        let page = (self.offset / self.viewport_width).round();
        self.scroll_to(page * self.viewport_width, true);
    }

    /// Change both widths, then re-clamp once against the new range.
    pub fn set_widths(&mut self, viewport_width: f64, content_width: f64) {
        self.viewport_width = viewport_width.max(0.0);
        self.content_width = content_width.max(0.0);
        self.reclamp();
    }

    /// Change the viewport width and re-clamp.
    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width.max(0.0);
        self.reclamp();
    }

    /// Change the content width and re-clamp.
    pub fn set_content_width(&mut self, width: f64) {
        self.content_width = width.max(0.0);
        self.reclamp();
    }

    /// Advance any running animation to `now` and report a scroll event.
    ///
    /// Returns the new offset when it changed since the last event. While an
    /// animation runs, events are spaced at least one frame interval apart;
    /// the final animation frame is always reported.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        if let Some(next) = self.advance(now) {
            self.jump(next);
        }

        if !self.dirty {
            return None;
        }
        let throttled = self.animation.is_some()
            && self
                .last_event
                .is_some_and(|last| now.saturating_duration_since(last) < self.motion.frame_interval);
        if throttled {
            return None;
        }

        self.dirty = false;
        self.last_event = Some(now);
        Some(self.offset)
    }

    fn advance(&mut self, now: Instant) -> Option<f64> {
        let anim = self.animation.as_mut()?;
        let started = *anim.started.get_or_insert(now);
        let total = self.motion.duration.as_secs_f64();
        let t = if total > 0.0 {
            now.saturating_duration_since(started).as_secs_f64() / total
        } else {
            1.0
        };

        if t >= 1.0 {
            let to = anim.to;
            self.animation = None;
            return Some(to);
        }
        Some(anim.from + (anim.to - anim.from) * self.motion.easing.apply(t))
    }

    fn jump(&mut self, x: f64) {
        if (x - self.offset).abs() > f64::EPSILON {
            self.offset = x;
            self.dirty = true;
        }
    }

    fn clamp(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }
        x.clamp(0.0, self.max_offset())
    }

    fn reclamp(&mut self) {
        let max = self.max_offset();
        if let Some(anim) = self.animation.as_mut() {
            anim.to = anim.to.clamp(0.0, max);
        }
        let x = self.clamp(self.offset);
        self.jump(x);
    }
}

impl Default for ScrollSurface {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

// ---------------------------------------------------------------------------
// ScrollHandle
// ---------------------------------------------------------------------------

/// Shared, optional attachment to a [`ScrollSurface`].
///
/// Cloning shares the same slot. The owning component attaches its surface
/// when it is created; everyone else issues scroll commands through the
/// handle.
#[derive(Clone, Default)]
pub struct ScrollHandle {
    slot: Rc<RefCell<Option<ScrollSurface>>>,
}

impl ScrollHandle {
    /// A detached handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `surface`, replacing any previous one.
    pub fn attach(&self, surface: ScrollSurface) {
        *self.slot.borrow_mut() = Some(surface);
    }

    /// Detach and return the current surface.
    pub fn detach(&self) -> Option<ScrollSurface> {
        self.slot.borrow_mut().take()
    }

    pub fn is_attached(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Programmatic scroll, failing when no surface is attached.
    pub fn try_scroll_to(&self, x: f64, animated: bool) -> Result<()> {
        let mut slot = self.slot.borrow_mut();
        let surface = slot.as_mut().ok_or(TabsError::Detached)?;
        surface.scroll_to(x, animated);
        tracing::debug!(x, animated, "programmatic scroll");
        Ok(())
    }

    /// Programmatic scroll; a no-op when detached.
    pub fn scroll_to(&self, x: f64, animated: bool) {
        if let Err(err) = self.try_scroll_to(x, animated) {
            tracing::trace!(%err, x, "programmatic scroll ignored");
        }
    }

    /// Run `f` against the attached surface.
    pub fn with<R>(&self, f: impl FnOnce(&mut ScrollSurface) -> R) -> Option<R> {
        self.slot.borrow_mut().as_mut().map(f)
    }

    /// Current offset of the attached surface.
    pub fn offset(&self) -> Option<f64> {
        self.slot.borrow().as_ref().map(ScrollSurface::offset)
    }
}

impl fmt::Debug for ScrollHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollHandle")
            .field("attached", &self.is_attached())
            .field("offset", &self.offset())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn motion() -> ScrollMotion {
        ScrollMotion {
            duration: ms(100),
            easing: Easing::Linear,
            frame_interval: ms(16),
        }
    }

    // -----------------------------------------------------------------------
    // ScrollSurface
    // -----------------------------------------------------------------------

    #[test]
    fn max_offset() {
        assert_eq!(ScrollSurface::new(300.0, 900.0).max_offset(), 600.0);
        assert_eq!(ScrollSurface::new(300.0, 100.0).max_offset(), 0.0);
    }

    #[test]
    fn immediate_scroll_reports_once() {
        let mut s = ScrollSurface::new(300.0, 900.0);
        let t0 = Instant::now();
        s.scroll_to(300.0, false);
        assert_eq!(s.offset(), 300.0);
        assert_eq!(s.tick(t0), Some(300.0));
        assert_eq!(s.tick(t0 + ms(16)), None);
    }

    #[test]
    fn scroll_is_clamped() {
        let mut s = ScrollSurface::new(300.0, 900.0);
        s.scroll_to(5000.0, false);
        assert_eq!(s.offset(), 600.0);
        s.drag_to(-20.0);
        assert_eq!(s.offset(), 0.0);
    }

    #[test]
    fn scroll_to_same_offset_is_silent() {
        let mut s = ScrollSurface::new(300.0, 900.0);
        s.scroll_to(0.0, false);
        assert_eq!(s.tick(Instant::now()), None);
    }

    #[test]
    fn animated_scroll_progresses_and_lands() {
        let mut s = ScrollSurface::new(300.0, 900.0).with_motion(motion());
        let t0 = Instant::now();
        s.scroll_to(600.0, true);
        assert!(s.is_animating());
        assert_eq!(s.target(), 600.0);

        // First tick arms the clock.
        assert_eq!(s.tick(t0), None);
        let mid = s.tick(t0 + ms(50)).unwrap();
        assert!((mid - 300.0).abs() < 1e-6);

        assert_eq!(s.tick(t0 + ms(100)), Some(600.0));
        assert!(!s.is_animating());
    }

    #[test]
    fn animated_events_are_throttled() {
        let mut s = ScrollSurface::new(300.0, 900.0).with_motion(motion());
        let t0 = Instant::now();
        s.scroll_to(600.0, true);
        s.tick(t0);
        assert!(s.tick(t0 + ms(20)).is_some());
        // 5ms later: moved but inside the frame interval.
        assert_eq!(s.tick(t0 + ms(25)), None);
        assert!(s.has_pending_event());
        assert!(s.tick(t0 + ms(36)).is_some());
    }

    #[test]
    fn final_frame_is_never_throttled() {
        let mut s = ScrollSurface::new(300.0, 900.0).with_motion(motion());
        let t0 = Instant::now();
        s.scroll_to(300.0, true);
        s.tick(t0);
        assert!(s.tick(t0 + ms(95)).is_some());
        assert_eq!(s.tick(t0 + ms(100)), Some(300.0));
    }

    #[test]
    fn zero_duration_jumps() {
        let mut s = ScrollSurface::new(300.0, 900.0).with_motion(ScrollMotion {
            duration: Duration::ZERO,
            ..motion()
        });
        s.scroll_to(300.0, true);
        assert!(!s.is_animating());
        assert_eq!(s.offset(), 300.0);
    }

    #[test]
    fn drag_cancels_animation() {
        let mut s = ScrollSurface::new(300.0, 900.0).with_motion(motion());
        s.scroll_to(600.0, true);
        s.drag_to(120.0);
        assert!(!s.is_animating());
        assert_eq!(s.offset(), 120.0);
    }

    #[test]
    fn release_snaps_to_nearest_page() {
        let mut s = ScrollSurface::new(300.0, 900.0)
            .paging(true)
            .with_motion(motion());
        s.drag_to(170.0);
        s.release();
        assert_eq!(s.target(), 300.0);

        s.drag_to(140.0);
        s.release();
        assert_eq!(s.target(), 0.0);
    }

    #[test]
    fn release_without_paging_stays() {
        let mut s = ScrollSurface::new(300.0, 900.0);
        s.drag_to(170.0);
        s.release();
        assert!(!s.is_animating());
        assert_eq!(s.offset(), 170.0);
    }

    #[test]
    fn shrinking_content_reclamps() {
        let mut s = ScrollSurface::new(300.0, 900.0);
        s.scroll_to(600.0, false);
        s.tick(Instant::now());
        s.set_content_width(500.0);
        assert_eq!(s.offset(), 200.0);
        assert!(s.has_pending_event());
    }

    #[test]
    fn growing_viewport_keeps_offset_when_valid() {
        let mut s = ScrollSurface::new(300.0, 900.0);
        s.scroll_to(300.0, false);
        s.tick(Instant::now());
        s.set_content_width(1800.0);
        s.set_viewport_width(600.0);
        assert_eq!(s.offset(), 300.0);
        assert!(!s.has_pending_event());
    }

    #[test]
    fn set_widths_reclamps_against_new_range() {
        let mut s = ScrollSurface::new(300.0, 900.0);
        s.scroll_to(600.0, false);
        s.tick(Instant::now());

        s.set_widths(600.0, 1800.0);
        assert_eq!(s.offset(), 600.0);
        assert!(!s.has_pending_event());

        s.set_widths(300.0, 300.0);
        assert_eq!(s.offset(), 0.0);
        assert!(s.has_pending_event());
    }

    // -----------------------------------------------------------------------
    // ScrollHandle
    // -----------------------------------------------------------------------

    #[test]
    fn detached_handle_is_noop() {
        let handle = ScrollHandle::new();
        assert!(!handle.is_attached());
        handle.scroll_to(300.0, true);
        assert!(matches!(
            handle.try_scroll_to(300.0, true),
            Err(TabsError::Detached)
        ));
        assert_eq!(handle.offset(), None);
    }

    #[test]
    fn clones_share_the_surface() {
        let handle = ScrollHandle::new();
        let other = handle.clone();
        handle.attach(ScrollSurface::new(300.0, 900.0));
        other.scroll_to(600.0, false);
        assert_eq!(handle.offset(), Some(600.0));
        assert_eq!(handle.with(|s| s.tick(Instant::now())), Some(Some(600.0)));
    }

    #[test]
    fn detach_returns_surface() {
        let handle = ScrollHandle::new();
        handle.attach(ScrollSurface::new(10.0, 20.0));
        let surface = handle.detach().unwrap();
        assert_eq!(surface.content_width(), 20.0);
        assert!(!handle.is_attached());
    }
}
