//! UI Theme - Shared colors and styling constants

use macroquad::prelude::Color;

// =============================================================================
// Base UI Colors
// =============================================================================

/// Workspace background behind windows
pub const BG_COLOR: Color = Color::new(0.11, 0.11, 0.13, 1.0);

/// Panel and window body
pub const PANEL_BG: Color = Color::new(0.14, 0.14, 0.16, 1.0);

/// Header/title bar background
pub const HEADER_COLOR: Color = Color::new(0.18, 0.18, 0.22, 1.0);

/// Title bar of the focused window
pub const HEADER_FOCUSED: Color = Color::new(0.22, 0.16, 0.14, 1.0);

/// Panel and window outlines
pub const BORDER_COLOR: Color = Color::new(0.314, 0.314, 0.314, 1.0);

/// Primary text color
pub const TEXT_COLOR: Color = Color::new(0.8, 0.8, 0.85, 1.0);

/// Dimmed/secondary text
pub const TEXT_DIM: Color = Color::new(0.4, 0.4, 0.45, 1.0);

/// Highlight for focus, checked state and primary buttons (Diablo ember)
pub const ACCENT_COLOR: Color = Color::new(0.78, 0.33, 0.12, 1.0);

/// Darkening drawn behind modal dialogs
pub const MODAL_SHADE: Color = Color::new(0.0, 0.0, 0.0, 0.7);

// =============================================================================
// Font Sizes
// =============================================================================

pub const FONT_SIZE_HEADER: f32 = 16.0;
pub const FONT_SIZE_CONTENT: f32 = 14.0;
pub const FONT_SIZE_SMALL: f32 = 12.0;

// =============================================================================
// Dropdown/Menu Colors
// =============================================================================

pub const DROPDOWN_BG: Color = Color::new(0.176, 0.176, 0.196, 1.0); // ~45, 45, 50
pub const DROPDOWN_BORDER: Color = Color::new(0.314, 0.314, 0.314, 1.0); // ~80, 80, 80
pub const DROPDOWN_HOVER: Color = Color::new(0.235, 0.314, 0.392, 1.0); // ~60, 80, 100

// =============================================================================
// Lists and trees
// =============================================================================

pub const ROW_EVEN: Color = Color::new(0.13, 0.13, 0.15, 1.0);
pub const ROW_ODD: Color = Color::new(0.11, 0.11, 0.13, 1.0);
pub const ROW_HOVER: Color = Color::new(0.2, 0.25, 0.3, 1.0);
pub const ROW_SELECTED: Color = Color::new(0.3, 0.22, 0.16, 1.0);
