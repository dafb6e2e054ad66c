//! Widget trait: the content shown inside a tab.
//!
//! A tab supplies a factory that produces a boxed [`Widget`]. The content
//! pager calls the factory once, the first time the tab is mounted, and
//! renders the result into the tab's page.

use std::any::Any;
use std::rc::Rc;

use crate::geometry::Region;
use crate::render::strip::Strip;

/// Something that can paint itself into a region.
///
/// Object-safe: the pager stores widgets as `Box<dyn Widget>`.
pub trait Widget {
    /// A short type name, used in logs and debugging output.
    fn widget_type(&self) -> &str;

    /// Render into `region`. Strips use absolute coordinates and may extend
    /// past the region; the caller crops them.
    fn render(&self, region: Region) -> Vec<Strip>;

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;
}

/// Produces a tab's content widget on first mount.
pub type WidgetFactory = Rc<dyn Fn() -> Box<dyn Widget>>;
