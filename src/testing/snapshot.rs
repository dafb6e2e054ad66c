//! Snapshot rendering helpers.
//!
//! Turn rendered output (widgets, strips, whole views) into plain text for
//! snapshot tests and assertions. Rows are right-trimmed and joined with
//! `'\n'`; there is no trailing newline.

use crate::geometry::Region;
use crate::render::compositor::Compositor;
use crate::render::strip::Strip;
use crate::view::TabView;
use crate::widget::Widget;

/// Render a widget into a `width` x `height` region at the origin.
pub fn render_to_string(widget: &dyn Widget, width: i32, height: i32) -> String {
    let strips = widget.render(Region::new(0, 0, width, height));
    strips_to_string(&strips, width, height)
}

/// Render a whole view at its current size.
pub fn view_to_string(view: &TabView) -> String {
    compositor_to_string(&view.render())
}

/// Overlay strips onto a blank `width` x `height` grid.
pub fn strips_to_string(strips: &[Strip], width: i32, height: i32) -> String {
    if width <= 0 || height <= 0 {
        return String::new();
    }
    let mut frame = Compositor::new(width as u16, height as u16);
    frame.place_strips(strips, frame.region());
    compositor_to_string(&frame)
}

/// Every row of a screen buffer.
pub fn compositor_to_string(frame: &Compositor) -> String {
    (0..frame.height)
        .map(|y| frame.row_text(y).trim_end().to_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::strip::CellStyle;
    use crate::widgets::Text;

    #[test]
    fn widget_to_string() {
        let out = render_to_string(&Text::new("hello\nworld"), 10, 3);
        assert_eq!(out, "hello\nworld\n");
    }

    #[test]
    fn strips_clip_to_grid() {
        let mut s = Strip::new(0, 3);
        s.push_str("abcdef", CellStyle::default());
        assert_eq!(strips_to_string(&[s], 5, 1), "   ab");
    }

    #[test]
    fn empty_grid() {
        assert_eq!(strips_to_string(&[], 0, 4), "");
    }
}
