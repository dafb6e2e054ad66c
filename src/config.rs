//! Pager configuration.
//!
//! [`TabsConfig`] carries the timing and presentation knobs shared by the
//! content pager and the tab bar. Built with `with_*` methods on top of
//! [`Default`].

use std::time::Duration;

use crate::animation::Easing;
use crate::widget::scroll::ScrollMotion;

/// Configuration for a [`TabView`](crate::view::TabView).
#[derive(Debug, Clone, PartialEq)]
pub struct TabsConfig {
    /// Wait after a viewport width change before re-centering the content.
    pub settle_delay: Duration,
    /// Length of an animated programmatic scroll.
    pub scroll_duration: Duration,
    /// Curve for animated scrolls.
    pub easing: Easing,
    /// Minimum spacing between scroll events while animating; also the
    /// frame period of the live loop.
    pub frame_interval: Duration,
    /// Cells of horizontal padding on each side of a label.
    pub label_padding: u16,
    /// Rows reserved for the tab bar, underline included.
    pub bar_height: u16,
    /// Label color for the active tab.
    pub selected_color: String,
    /// Label color for the other tabs.
    pub unselected_color: String,
    /// Underline color.
    pub underline_color: String,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(50),
            scroll_duration: Duration::from_millis(250),
            easing: Easing::CubicOut,
            frame_interval: Duration::from_millis(16),
            label_padding: 2,
            bar_height: 3,
            selected_color: "white".to_owned(),
            unselected_color: "grey".to_owned(),
            underline_color: "red".to_owned(),
        }
    }
}

impl TabsConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resize settle delay (builder).
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the animated scroll duration (builder). Zero disables animation.
    pub fn with_scroll_duration(mut self, duration: Duration) -> Self {
        self.scroll_duration = duration;
        self
    }

    /// Set the easing curve (builder).
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the frame interval (builder).
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Set the label padding (builder).
    pub fn with_label_padding(mut self, padding: u16) -> Self {
        self.label_padding = padding;
        self
    }

    /// Set the tab bar height (builder).
    pub fn with_bar_height(mut self, rows: u16) -> Self {
        self.bar_height = rows;
        self
    }

    /// Set selected and unselected label colors (builder).
    pub fn with_label_colors(
        mut self,
        selected: impl Into<String>,
        unselected: impl Into<String>,
    ) -> Self {
        self.selected_color = selected.into();
        self.unselected_color = unselected.into();
        self
    }

    /// Set the underline color (builder).
    pub fn with_underline_color(mut self, color: impl Into<String>) -> Self {
        self.underline_color = color.into();
        self
    }

    /// Scroll motion parameters for the pager surfaces.
    pub fn motion(&self) -> ScrollMotion {
        ScrollMotion {
            duration: self.scroll_duration,
            easing: self.easing,
            frame_interval: self.frame_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TabsConfig::default();
        assert_eq!(config.settle_delay, Duration::from_millis(50));
        assert_eq!(config.frame_interval, Duration::from_millis(16));
        assert_eq!(config.bar_height, 3);
        assert_eq!(config.label_padding, 2);
    }

    #[test]
    fn builders_chain() {
        let config = TabsConfig::new()
            .with_settle_delay(Duration::from_millis(10))
            .with_scroll_duration(Duration::ZERO)
            .with_easing(Easing::Linear)
            .with_bar_height(2)
            .with_label_padding(1)
            .with_label_colors("yellow", "blue")
            .with_underline_color("green");
        assert_eq!(config.settle_delay, Duration::from_millis(10));
        assert_eq!(config.scroll_duration, Duration::ZERO);
        assert_eq!(config.easing, Easing::Linear);
        assert_eq!(config.bar_height, 2);
        assert_eq!(config.label_padding, 1);
        assert_eq!(config.selected_color, "yellow");
        assert_eq!(config.unselected_color, "blue");
        assert_eq!(config.underline_color, "green");
    }

    #[test]
    fn motion_mirrors_config() {
        let config = TabsConfig::new().with_frame_interval(Duration::from_millis(8));
        let motion = config.motion();
        assert_eq!(motion.duration, config.scroll_duration);
        assert_eq!(motion.frame_interval, Duration::from_millis(8));
    }
}
