//! Headless testing: Pilot and snapshot helpers.
//!
//! Use the [`Pilot`] to drive a [`TabView`](crate::view::TabView) on a
//! virtual clock. Use [`render_to_string`] and [`view_to_string`] to capture
//! rendered output as plain text.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{render_to_string, strips_to_string, view_to_string};
