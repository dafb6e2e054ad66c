//! Text widget: fixed, multi-line page content.

use std::any::Any;

use unicode_width::UnicodeWidthChar;

use crate::geometry::Region;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::Widget;

/// Fixed text split on `'\n'`, one strip per line.
///
/// Lines are truncated to the region width (in display columns) and limited
/// to the region height. With [`centered`](Text::centered) each line is
/// horizontally centered in the region.
pub struct Text {
    content: String,
    style: CellStyle,
    centered: bool,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: CellStyle::default(),
            centered: false,
        }
    }

    /// Set the cell style (builder).
    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    /// Center each line horizontally (builder).
    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Longest prefix of `line` that fits in `max` columns, and its width.
fn fit(line: &str, max: usize) -> (&str, usize) {
    let mut used = 0;
    for (idx, ch) in line.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > max {
            return (&line[..idx], used);
        }
        used += w;
    }
    (line, used)
}

impl Widget for Text {
    fn widget_type(&self) -> &str {
        "Text"
    }

    fn render(&self, region: Region) -> Vec<Strip> {
        if region.is_empty() {
            return Vec::new();
        }

        let max_width = region.width as usize;
        self.content
            .split('\n')
            .take(region.height as usize)
            .enumerate()
            .map(|(i, line)| {
                let (visible, width) = fit(line, max_width);
                let indent = if self.centered {
                    (max_width - width) / 2
                } else {
                    0
                };
                let mut strip = Strip::new(region.y + i as i32, region.x + indent as i32);
                strip.push_str(visible, self.style.clone());
                strip
            })
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lines_and_limits_height() {
        let strips = Text::new("a\nb\nc").render(Region::new(0, 5, 10, 2));
        assert_eq!(strips.len(), 2);
        assert_eq!(strips[0].text(), "a");
        assert_eq!(strips[1].y, 6);
    }

    #[test]
    fn truncates_by_display_width() {
        let strips = Text::new("日本語").render(Region::new(0, 0, 5, 1));
        assert_eq!(strips[0].text(), "日本");
    }

    #[test]
    fn centered_indents() {
        let strips = Text::new("ab").centered().render(Region::new(10, 0, 6, 1));
        assert_eq!(strips[0].x_offset, 12);
    }

    #[test]
    fn empty_region_renders_nothing() {
        assert!(Text::new("x").render(Region::new(0, 0, 0, 3)).is_empty());
    }

    #[test]
    fn applies_style() {
        let strips = Text::new("x")
            .with_style(CellStyle::fg("cyan"))
            .render(Region::new(0, 0, 3, 1));
        assert_eq!(strips[0].cells[0].style.fg.as_deref(), Some("cyan"));
    }
}
