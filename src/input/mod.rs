//! Keyboard input handling

mod shortcuts;

pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry, ShortcutScope};
