//! Keyboard shortcuts
//!
//! Two scopes: global shortcuts registered once at startup, and window
//! shortcuts owned by whichever editor currently has focus. Focus changes
//! clear the window scope before the new editor registers its own.

use macroquad::prelude::*;

/// A keyboard shortcut (key + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub key: KeyCode,
    pub ctrl: bool, // Cmd on Mac
    pub shift: bool,
    pub alt: bool,
}

impl Shortcut {
    pub fn key(key: KeyCode) -> Self {
        Self { key, ctrl: false, shift: false, alt: false }
    }

    pub fn ctrl(key: KeyCode) -> Self {
        Self { key, ctrl: true, shift: false, alt: false }
    }

    pub fn ctrl_shift(key: KeyCode) -> Self {
        Self { key, ctrl: true, shift: true, alt: false }
    }

    pub fn alt(key: KeyCode) -> Self {
        Self { key, ctrl: false, shift: false, alt: true }
    }

    /// Check if this shortcut was pressed this frame
    pub fn is_pressed(&self) -> bool {
        if !is_key_pressed(self.key) {
            return false;
        }

        let ctrl_down = is_key_down(KeyCode::LeftControl)
            || is_key_down(KeyCode::RightControl)
            || is_key_down(KeyCode::LeftSuper)
            || is_key_down(KeyCode::RightSuper);
        let shift_down = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);
        let alt_down = is_key_down(KeyCode::LeftAlt) || is_key_down(KeyCode::RightAlt);

        self.ctrl == ctrl_down && self.shift == shift_down && self.alt == alt_down
    }

    /// Format for menus, e.g. "Ctrl+Shift+P"
    pub fn display(&self) -> String {
        let mut text = String::new();
        if self.ctrl {
            text.push_str("Ctrl+");
        }
        if self.shift {
            text.push_str("Shift+");
        }
        if self.alt {
            text.push_str("Alt+");
        }
        text.push_str(key_name(self.key));
        text
    }
}

fn key_name(key: KeyCode) -> &'static str {
    match key {
        KeyCode::M => "M",
        KeyCode::N => "N",
        KeyCode::O => "O",
        KeyCode::P => "P",
        KeyCode::Q => "Q",
        KeyCode::S => "S",
        KeyCode::W => "W",
        KeyCode::Escape => "Esc",
        KeyCode::F1 => "F1",
        KeyCode::Enter => "Enter",
        KeyCode::Delete => "Del",
        _ => "?",
    }
}

/// What a shortcut asks the application to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutAction {
    NewProject,
    OpenProject,
    Preferences,
    ToggleProjectExplorer,
    ToggleMpqExplorer,
    About,
    ClosePopups,
    Quit,
    SaveEditor(String),
    CloseEditor(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutScope {
    Global,
    Window,
}

#[derive(Debug, Default)]
pub struct ShortcutRegistry {
    global: Vec<(Shortcut, ShortcutAction)>,
    window: Vec<(Shortcut, ShortcutAction)>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Application-wide bindings
    pub fn with_global_defaults() -> Self {
        let mut registry = Self::new();
        let bindings = [
            (Shortcut::ctrl(KeyCode::N), ShortcutAction::NewProject),
            (Shortcut::ctrl(KeyCode::O), ShortcutAction::OpenProject),
            (Shortcut::ctrl_shift(KeyCode::P), ShortcutAction::Preferences),
            (Shortcut::alt(KeyCode::P), ShortcutAction::ToggleProjectExplorer),
            (Shortcut::alt(KeyCode::M), ShortcutAction::ToggleMpqExplorer),
            (Shortcut::key(KeyCode::F1), ShortcutAction::About),
            (Shortcut::key(KeyCode::Escape), ShortcutAction::ClosePopups),
            (Shortcut::ctrl(KeyCode::Q), ShortcutAction::Quit),
        ];
        for (shortcut, action) in bindings {
            registry.register(shortcut, action, ShortcutScope::Global);
        }
        registry
    }

    pub fn register(&mut self, shortcut: Shortcut, action: ShortcutAction, scope: ShortcutScope) {
        let list = match scope {
            ShortcutScope::Global => &mut self.global,
            ShortcutScope::Window => &mut self.window,
        };
        list.retain(|(existing, _)| *existing != shortcut);
        list.push((shortcut, action));
    }

    pub fn unregister_window_shortcuts(&mut self) {
        self.window.clear();
    }

    #[cfg(test)]
    pub fn window_shortcuts(&self) -> &[(Shortcut, ShortcutAction)] {
        &self.window
    }

    /// Actions whose shortcut `pressed` reports as triggered. Window
    /// bindings shadow global ones on the same keys.
    pub fn triggered_with<P>(&self, pressed: P) -> Vec<ShortcutAction>
    where
        P: Fn(&Shortcut) -> bool,
    {
        let mut actions = Vec::new();
        let mut used = Vec::new();
        for (shortcut, action) in self.window.iter().chain(self.global.iter()) {
            if used.contains(shortcut) || !pressed(shortcut) {
                continue;
            }
            used.push(*shortcut);
            actions.push(action.clone());
        }
        actions
    }

    /// Poll the keyboard. Nothing fires while a text field has focus.
    pub fn poll(&self, text_editing: bool) -> Vec<ShortcutAction> {
        if text_editing {
            return Vec::new();
        }
        self.triggered_with(Shortcut::is_pressed)
    }

    /// Display label for the first binding of `action`, for menus
    pub fn label_for(&self, action: &ShortcutAction) -> Option<String> {
        self.window
            .iter()
            .chain(self.global.iter())
            .find(|(_, a)| a == action)
            .map(|(shortcut, _)| shortcut.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_defaults() {
        let registry = ShortcutRegistry::with_global_defaults();
        let fired = registry.triggered_with(|s| *s == Shortcut::alt(KeyCode::M));
        assert_eq!(fired, vec![ShortcutAction::ToggleMpqExplorer]);
        assert_eq!(registry.label_for(&ShortcutAction::Preferences).as_deref(), Some("Ctrl+Shift+P"));
    }

    #[test]
    fn test_window_scope_is_replaced() {
        let mut registry = ShortcutRegistry::with_global_defaults();
        registry.register(Shortcut::ctrl(KeyCode::S), ShortcutAction::SaveEditor("a".into()), ShortcutScope::Window);
        registry.unregister_window_shortcuts();
        registry.register(Shortcut::ctrl(KeyCode::S), ShortcutAction::SaveEditor("b".into()), ShortcutScope::Window);

        let fired = registry.triggered_with(|s| *s == Shortcut::ctrl(KeyCode::S));
        assert_eq!(fired, vec![ShortcutAction::SaveEditor("b".into())]);
        assert_eq!(registry.window_shortcuts().len(), 1);
    }

    #[test]
    fn test_window_binding_shadows_global() {
        let mut registry = ShortcutRegistry::with_global_defaults();
        registry.register(Shortcut::ctrl(KeyCode::Q), ShortcutAction::CloseEditor("a".into()), ShortcutScope::Window);
        let fired = registry.triggered_with(|s| *s == Shortcut::ctrl(KeyCode::Q));
        assert_eq!(fired, vec![ShortcutAction::CloseEditor("a".into())]);
    }

    #[test]
    fn test_text_editing_suppresses_shortcuts() {
        let registry = ShortcutRegistry::with_global_defaults();
        assert!(registry.poll(true).is_empty());
    }
}
