//! Screen buffer and frame diffing.
//!
//! Each frame the view renders into a fresh [`Compositor`]; `diff` against the
//! previous frame yields only the [`CellUpdate`]s the driver has to write.

use crate::geometry::{Region, Size};

use super::strip::{Strip, StyledCell};

/// A single cell that changed between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub x: u16,
    pub y: u16,
    pub cell: StyledCell,
}

/// A full-screen grid of styled cells. `screen[y][x]` is column x, row y.
#[derive(Debug, Clone)]
pub struct Compositor {
    screen: Vec<Vec<StyledCell>>,
    pub width: u16,
    pub height: u16,
}

impl Compositor {
    /// A blank screen of the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screen: Self::blank_screen(width, height),
            width,
            height,
        }
    }

    /// A blank screen matching `size`. Negative sizes become zero.
    pub fn for_size(size: Size) -> Self {
        let clamp = |v: i32| v.clamp(0, i32::from(u16::MAX)) as u16;
        Self::new(clamp(size.width), clamp(size.height))
    }

    pub fn region(&self) -> Region {
        Region::new(0, 0, i32::from(self.width), i32::from(self.height))
    }

    /// Write `strips` into the buffer, clipped to `clip` and the screen.
    pub fn place_strips(&mut self, strips: &[Strip], clip: Region) {
        let clip = clip.intersection(self.region());
        if clip.is_empty() {
            return;
        }

        for strip in strips {
            if strip.y < clip.y || strip.y >= clip.bottom() {
                continue;
            }
            let row = &mut self.screen[strip.y as usize];
            for (i, cell) in strip.cells.iter().enumerate() {
                let x = strip.x_offset + i as i32;
                if x >= clip.x && x < clip.right() {
                    row[x as usize] = cell.clone();
                }
            }
        }
    }

    /// Cells that differ from `previous`. Cells outside the previous frame's
    /// bounds always count as changed.
    pub fn diff(&self, previous: &Compositor) -> Vec<CellUpdate> {
        let mut updates = Vec::new();
        for (y, row) in self.screen.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let unchanged = previous
                    .screen
                    .get(y)
                    .and_then(|r| r.get(x))
                    .is_some_and(|old| old == cell);
                if !unchanged {
                    updates.push(CellUpdate {
                        x: x as u16,
                        y: y as u16,
                        cell: cell.clone(),
                    });
                }
            }
        }
        updates
    }

    /// Every cell, for the first frame after a resize.
    pub fn full(&self) -> Vec<CellUpdate> {
        self.diff(&Compositor::new(0, 0))
    }

    pub fn get_cell(&self, x: u16, y: u16) -> Option<&StyledCell> {
        self.screen.get(y as usize).and_then(|row| row.get(x as usize))
    }

    /// Row `y` as plain text.
    pub fn row_text(&self, y: u16) -> String {
        self.screen
            .get(y as usize)
            .map(|row| row.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    fn blank_screen(width: u16, height: u16) -> Vec<Vec<StyledCell>> {
        (0..height)
            .map(|_| vec![StyledCell::blank(); width as usize])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::strip::CellStyle;

    fn strip(y: i32, x: i32, text: &str) -> Strip {
        let mut s = Strip::new(y, x);
        s.push_str(text, CellStyle::default());
        s
    }

    #[test]
    fn blank_on_creation() {
        let c = Compositor::new(4, 2);
        assert_eq!(c.row_text(0), "    ");
        assert!(c.get_cell(4, 0).is_none());
    }

    #[test]
    fn for_size_clamps_negative() {
        let c = Compositor::for_size(Size::new(-3, 2));
        assert_eq!(c.width, 0);
        assert_eq!(c.height, 2);
    }

    #[test]
    fn place_strips_clips() {
        let mut c = Compositor::new(6, 2);
        c.place_strips(&[strip(0, -1, "abcdefgh"), strip(5, 0, "zz")], c.region());
        assert_eq!(c.row_text(0), "bcdefg");

        let mut c = Compositor::new(6, 2);
        c.place_strips(&[strip(1, 0, "abcdef")], Region::new(2, 0, 2, 2));
        assert_eq!(c.row_text(1), "  cd  ");
    }

    #[test]
    fn diff_reports_changed_cells_only() {
        let prev = Compositor::new(3, 1);
        let mut next = Compositor::new(3, 1);
        next.place_strips(&[strip(0, 1, "x")], next.region());
        let updates = next.diff(&prev);
        assert_eq!(updates.len(), 1);
        assert_eq!((updates[0].x, updates[0].y, updates[0].cell.ch), (1, 0, 'x'));
    }

    #[test]
    fn full_covers_every_cell() {
        assert_eq!(Compositor::new(3, 2).full().len(), 6);
    }
}
