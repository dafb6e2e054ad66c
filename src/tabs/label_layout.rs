//! Flex layout of the tab-bar labels.
//!
//! Labels sit in a row whose minimum width is the viewport width. Each label
//! starts at its intrinsic width (title plus padding on both sides) and
//! grows equally into the leftover space. When the labels overflow, they
//! keep their intrinsic widths and the bar scrolls.

use taffy::prelude::*;
use unicode_width::UnicodeWidthStr;

use super::tab_bar::LayoutEntry;
use crate::error::Result;

/// Intrinsic label width in cells: display width of `title` plus padding.
pub fn intrinsic_width(title: &str, padding: u16) -> f32 {
    title.width() as f32 + 2.0 * f32::from(padding)
}

/// Compute `(left, width)` for every title, in order.
pub fn layout_labels<S: AsRef<str>>(
    titles: &[S],
    viewport_width: f64,
    padding: u16,
) -> Result<Vec<LayoutEntry>> {
    let mut tree: TaffyTree<()> = TaffyTree::new();
    let viewport = viewport_width.max(0.0) as f32;

    let leaves = titles
        .iter()
        .map(|title| {
            tree.new_leaf(Style {
                flex_basis: Dimension::from_length(intrinsic_width(title.as_ref(), padding)),
                flex_grow: 1.0,
                flex_shrink: 0.0,
                ..Default::default()
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let root = tree.new_with_children(
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            min_size: Size {
                width: Dimension::from_length(viewport),
                height: Dimension::AUTO,
            },
            ..Default::default()
        },
        &leaves,
    )?;

    tree.compute_layout(
        root,
        Size {
            width: AvailableSpace::Definite(viewport),
            height: AvailableSpace::MaxContent,
        },
    )?;

    leaves
        .iter()
        .map(|&leaf| {
            let layout = tree.layout(leaf)?;
            Ok(LayoutEntry {
                left: f64::from(layout.location.x),
                width: f64::from(layout.size.width),
            })
        })
        .collect()
}
