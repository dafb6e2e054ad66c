//! Input events and key bindings.

pub mod binding;
pub mod input;

pub use binding::{BindingAction, KeyBindingRegistry};
pub use input::{from_crossterm, InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseEvent};
