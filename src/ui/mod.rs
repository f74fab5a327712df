//! Immediate-mode UI toolkit
//!
//! - Rectangle-based layout
//! - Layered pointer ownership for overlapping windows, panels and menus
//! - Macroquad integration for rendering

mod input;
mod menu_bar;
mod panel;
mod rect;
mod text_input;
pub mod theme;
mod widgets;
mod window;

pub use input::*;
pub use menu_bar::*;
pub use panel::*;
pub use rect::*;
pub use text_input::*;
pub use widgets::*;
pub use window::*;
