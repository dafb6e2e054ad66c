//! Built-in content widgets.

pub mod text;

pub use text::Text;
