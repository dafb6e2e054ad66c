//! Widget primitives: the content trait, lazy mounting, scroll surfaces.

pub mod lifecycle;
pub mod scroll;
pub mod traits;

pub use lifecycle::{LifecycleEvent, MountTracker};
pub use scroll::{ScrollHandle, ScrollMotion, ScrollSurface};
pub use traits::{Widget, WidgetFactory};
