//! The scrollable tab bar: labels, underline and auto-centering.
//!
//! Each label reports its measured geometry through
//! [`ScrollableTabBar::on_label_layout`]. Measured entries feed the
//! [`InterpolationTables`], from which the underline and the bar's own scroll
//! offset are interpolated at the current fractional index.

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::interpolate;
use crate::config::TabsConfig;
use crate::error::{Result, TabsError};
use crate::geometry::Region;
use crate::reactive::{untrack, Derived, Scope, SharedValue};
use crate::render::strip::{CellStyle, Strip};
use crate::widget::scroll::ScrollSurface;

use super::label_layout::layout_labels;
use super::state::TabState;

const UNDERLINE: char = '━';

// ---------------------------------------------------------------------------
// LayoutEntry / LayoutMap
// ---------------------------------------------------------------------------

/// Measured geometry of one label, in bar coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutEntry {
    pub left: f64,
    pub width: f64,
}

impl LayoutEntry {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// One slot per tab position, `None` until that label is measured.
///
/// Slots are never cleared; a new measurement replaces the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMap {
    slots: Vec<Option<LayoutEntry>>,
}

impl LayoutMap {
    pub fn new(count: usize) -> Self {
        Self {
            slots: vec![None; count],
        }
    }

    /// Store `entry` for `position`. Returns whether anything changed.
    ///
    /// Out-of-range positions are ignored.
    pub fn record(&mut self, position: usize, entry: LayoutEntry) -> bool {
        match self.slots.get_mut(position) {
            Some(slot) if *slot != Some(entry) => {
                *slot = Some(entry);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, position: usize) -> Option<LayoutEntry> {
        self.slots.get(position).copied().flatten()
    }

    /// Measured entries in ascending position order.
    pub fn measured(&self) -> impl Iterator<Item = (usize, LayoutEntry)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(pos, slot)| slot.map(|entry| (pos, entry)))
    }

    pub fn measured_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of slots (the tab count).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ---------------------------------------------------------------------------
// InterpolationTables
// ---------------------------------------------------------------------------

/// The scroll offset that centers a label in the viewport, never negative.
pub fn centering_offset(entry: LayoutEntry, viewport_width: f64) -> f64 {
    (entry.left - (viewport_width - entry.width) / 2.0).max(0.0)
}

/// Underline geometry in bar coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Underline {
    pub left: f64,
    pub width: f64,
}

/// Parallel tables keyed by measured tab position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InterpolationTables {
    pub input: Vec<f64>,
    pub left: Vec<f64>,
    pub width: Vec<f64>,
    pub scroll: Vec<f64>,
}

impl InterpolationTables {
    pub fn build(map: &LayoutMap, viewport_width: f64) -> Self {
        let mut tables = Self::default();
        for (pos, entry) in map.measured() {
            tables.input.push(pos as f64);
            tables.left.push(entry.left);
            tables.width.push(entry.width);
            tables.scroll.push(centering_offset(entry, viewport_width));
        }
        tables
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Underline at `index`; `{0, 0}` without layout data.
    pub fn underline(&self, index: f64) -> Underline {
        if self.is_empty() {
            return Underline::default();
        }
        Underline {
            left: interpolate(index, &self.input, &self.left),
            width: interpolate(index, &self.input, &self.width),
        }
    }

    /// Bar scroll offset at `index`; 0 without layout data.
    pub fn scroll_at(&self, index: f64) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        interpolate(index, &self.input, &self.scroll)
    }
}

// ---------------------------------------------------------------------------
// ScrollableTabBar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct LabelStyles {
    selected: CellStyle,
    unselected: CellStyle,
    underline: CellStyle,
}

/// One pressable label per tab in a horizontally scrollable strip, with an
/// underline that tracks the fractional index.
pub struct ScrollableTabBar {
    state: TabState,
    layout: SharedValue<LayoutMap>,
    tables: Derived<InterpolationTables>,
    underline: Derived<Underline>,
    surface: Rc<RefCell<ScrollSurface>>,
    label_padding: u16,
    styles: LabelStyles,
    _scope: Scope,
}

impl ScrollableTabBar {
    pub fn new(state: &TabState, config: &TabsConfig) -> Self {
        let viewport_width = state.viewport_width;
        let fractional_index = state.fractional_index;

        let mut scope = Scope::new();
        let layout = scope.shared(LayoutMap::new(state.tab_count()));
        let tables = scope.derived(move || {
            let width = viewport_width.get();
            layout.with(|map| InterpolationTables::build(map, width))
        });
        let underline = scope.derived(move || {
            let index = fractional_index.get();
            tables.with(|t| t.underline(index))
        });

        let width = viewport_width.get_untracked();
        let surface = Rc::new(RefCell::new(ScrollSurface::new(width, width)));

        let bar_surface = surface.clone();
        scope.reaction(
            move || {
                let index = fractional_index.get();
                tables.with(|t| t.scroll_at(index))
            },
            move |offset, _| {
                tracing::trace!(offset, "auto-centering tab bar");
                bar_surface.borrow_mut().scroll_to(*offset, false);
            },
        );

        Self {
            state: state.clone(),
            layout,
            tables,
            underline,
            surface,
            label_padding: config.label_padding,
            styles: LabelStyles {
                selected: CellStyle::fg(config.selected_color.clone()).bold(),
                unselected: CellStyle::fg(config.unselected_color.clone()),
                underline: CellStyle::fg(config.underline_color.clone()),
            },
            _scope: scope,
        }
    }

    /// Record a label's measured geometry, merging into the layout map.
    pub fn on_label_layout(&self, position: usize, entry: LayoutEntry) {
        if position >= self.state.tab_count() {
            tracing::trace!(position, "layout for unknown label ignored");
            return;
        }
        let changed = untrack(|| self.layout.with(|map| map.get(position) != Some(entry)));
        if changed {
            self.layout.update(|map| {
                map.record(position, entry);
            });
        }
    }

    /// Lay out every label for the current viewport width and report the
    /// geometry through [`on_label_layout`](Self::on_label_layout).
    pub fn measure(&self) -> Result<()> {
        let viewport = self.state.viewport_width.get_untracked();
        let entries = layout_labels(
            &self.state.tabs.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
            viewport,
            self.label_padding,
        )?;

        let content = entries.last().map_or(0.0, LayoutEntry::right).max(viewport);
        self.surface.borrow_mut().set_widths(viewport, content);

        for (position, entry) in entries.into_iter().enumerate() {
            self.on_label_layout(position, entry);
        }
        Ok(())
    }

    /// Press the label at `position`: animate the content pager to its page.
    pub fn press(&self, position: usize) -> Result<()> {
        let count = self.state.tab_count();
        if position >= count {
            return Err(TabsError::TabOutOfRange {
                index: position,
                count,
            });
        }
        let x = position as f64 * self.state.viewport_width.get_untracked();
        tracing::debug!(position, x, "tab pressed");
        self.state.scroll.scroll_to(x, true);
        Ok(())
    }

    /// The label under column `x`, relative to the bar's left edge.
    pub fn hit_test(&self, x: f64) -> Option<usize> {
        let bar_x = x + self.scroll_offset();
        untrack(|| {
            self.layout.with(|map| {
                map.measured()
                    .find(|(_, e)| bar_x >= e.left && bar_x < e.right())
                    .map(|(pos, _)| pos)
            })
        })
    }

    /// Whether the label at `position` is drawn emphasized.
    pub fn is_emphasized(&self, position: usize) -> bool {
        position < self.state.tab_count() && position == self.state.active_index.get_untracked()
    }

    pub fn underline(&self) -> Underline {
        self.underline.get_untracked()
    }

    pub fn tables(&self) -> InterpolationTables {
        self.tables.get_untracked()
    }

    pub fn layout(&self) -> LayoutMap {
        self.layout.get_untracked()
    }

    /// Current offset of the bar's own scroll surface.
    pub fn scroll_offset(&self) -> f64 {
        self.surface.borrow().offset()
    }

    /// Labels on the middle row (top row below three rows), underline on
    /// the bottom row when there are at least two rows.
    pub fn render(&self, region: Region) -> Vec<Strip> {
        if region.is_empty() {
            return Vec::new();
        }

        let offset = self.scroll_offset();
        let active = self.state.active_index.get_untracked();
        let label_row = if region.height >= 3 {
            (region.height - 1) / 2
        } else {
            0
        };
        let to_screen = |x: f64| region.x + (x - offset).round() as i32;

        let mut strips = Vec::new();
        for (position, entry) in self.layout().measured() {
            let style = if position == active {
                self.styles.selected.clone()
            } else {
                self.styles.unselected.clone()
            };
            let left = to_screen(entry.left);
            let width = entry.width.round() as i32;

            let mut label = Strip::new(region.y + label_row, 0);
            label.push_str(&self.state.tabs[position].title, style);
            let indent = ((width - label.width()) / 2).max(0);
            let label = label
                .shifted(left + indent)
                .crop(left.max(region.x), (left + width).min(region.right()));
            if label.width() > 0 {
                strips.push(label);
            }
        }

        if region.height >= 2 {
            let underline = self.underline();
            let mut strip = Strip::new(region.bottom() - 1, to_screen(underline.left));
            strip.repeat(
                UNDERLINE,
                underline.width.round().max(0.0) as usize,
                self.styles.underline.clone(),
            );
            let strip = strip.crop(region.x, region.right());
            if strip.width() > 0 {
                strips.push(strip);
            }
        }

        strips
    }
}
