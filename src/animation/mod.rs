//! Interpolation tables and easing curves.
//!
//! - [`interpolate`]: clamped piecewise-linear lookup.
//! - [`Easing`]: progress curves for animated scrolls.

pub mod easing;
pub mod interpolate;

pub use easing::Easing;
pub use interpolate::interpolate;
