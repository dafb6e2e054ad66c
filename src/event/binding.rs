//! Key binding registry for the pager.
//!
//! [`KeyBindingRegistry`] maps key+modifier combinations to [`BindingAction`]s.
//! `with_defaults()` installs arrow/tab navigation, digit shortcuts and quit.

use std::collections::HashMap;

use super::input::{Key, KeyEvent, Modifiers};

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingAction {
    Quit,
    PreviousTab,
    NextTab,
    FirstTab,
    LastTab,
    /// Jump to a tab by position.
    SelectTab(usize),
}

/// (Key, Modifiers) -> action.
#[derive(Debug, Clone, Default)]
pub struct KeyBindingRegistry {
    bindings: HashMap<(Key, Modifiers), BindingAction>,
}

impl KeyBindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard bindings:
    /// - `q`, `Esc`, `Ctrl+C` -> Quit
    /// - `Left`, `BackTab` -> PreviousTab; `Right`, `Tab` -> NextTab
    /// - `Home` / `End` -> first / last tab
    /// - `1`..`9` -> SelectTab(0..8)
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind(Key::Char('q'), Modifiers::NONE, BindingAction::Quit);
        registry.bind(Key::Escape, Modifiers::NONE, BindingAction::Quit);
        registry.bind(Key::Char('c'), Modifiers::CTRL, BindingAction::Quit);
        registry.bind(Key::Left, Modifiers::NONE, BindingAction::PreviousTab);
        registry.bind(Key::BackTab, Modifiers::SHIFT, BindingAction::PreviousTab);
        registry.bind(Key::BackTab, Modifiers::NONE, BindingAction::PreviousTab);
        registry.bind(Key::Right, Modifiers::NONE, BindingAction::NextTab);
        registry.bind(Key::Tab, Modifiers::NONE, BindingAction::NextTab);
        registry.bind(Key::Home, Modifiers::NONE, BindingAction::FirstTab);
        registry.bind(Key::End, Modifiers::NONE, BindingAction::LastTab);
        for (i, digit) in ('1'..='9').enumerate() {
            registry.bind(Key::Char(digit), Modifiers::NONE, BindingAction::SelectTab(i));
        }
        registry
    }

    /// Add or replace a binding.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: BindingAction) {
        self.bindings.insert((key, modifiers), action);
    }

    /// Remove a binding, returning its action.
    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<BindingAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// The action bound to `event`, if any.
    pub fn lookup(&self, event: &KeyEvent) -> Option<BindingAction> {
        self.bindings.get(&(event.code, event.modifiers)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve() {
        let r = KeyBindingRegistry::with_defaults();
        assert_eq!(
            r.lookup(&KeyEvent::plain(Key::Right)),
            Some(BindingAction::NextTab)
        );
        assert_eq!(
            r.lookup(&KeyEvent::new(Key::Char('c'), Modifiers::CTRL)),
            Some(BindingAction::Quit)
        );
        assert_eq!(
            r.lookup(&KeyEvent::plain(Key::Char('3'))),
            Some(BindingAction::SelectTab(2))
        );
        assert_eq!(r.lookup(&KeyEvent::plain(Key::Char('x'))), None);
    }

    #[test]
    fn modifiers_are_part_of_the_key() {
        let r = KeyBindingRegistry::with_defaults();
        assert_eq!(r.lookup(&KeyEvent::new(Key::Right, Modifiers::ALT)), None);
    }

    #[test]
    fn bind_and_unbind() {
        let mut r = KeyBindingRegistry::new();
        assert!(r.is_empty());
        r.bind(Key::Char('l'), Modifiers::NONE, BindingAction::NextTab);
        assert_eq!(r.len(), 1);
        assert_eq!(
            r.unbind(Key::Char('l'), Modifiers::NONE),
            Some(BindingAction::NextTab)
        );
        assert_eq!(r.lookup(&KeyEvent::plain(Key::Char('l'))), None);
    }
}
