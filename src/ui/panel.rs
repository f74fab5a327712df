//! Docked panels

use super::theme::*;
use super::{close_button, Rect, UiContext};
use macroquad::prelude::*;

pub const PANEL_TITLE_HEIGHT: f32 = 22.0;

/// Draw a panel background with optional title
pub fn draw_panel(rect: Rect, title: Option<&str>, bg_color: Color) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg_color);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, BORDER_COLOR);

    if let Some(title) = title {
        draw_rectangle(rect.x, rect.y, rect.w, PANEL_TITLE_HEIGHT, HEADER_COLOR);
        draw_text(title, rect.x + 6.0, rect.y + 15.0, FONT_SIZE_HEADER, WHITE);
    }
}

/// Get the content area of a panel (after title bar)
pub fn panel_content_rect(rect: Rect, has_title: bool) -> Rect {
    if has_title {
        rect.remaining_after_top(PANEL_TITLE_HEIGHT).pad(2.0)
    } else {
        rect.pad(2.0)
    }
}

/// A titled panel with a close button that owns its own pointer layer.
/// Returns (close_clicked, content_rect). Leaves `layer` entered so the
/// caller can draw widgets into the content; call `ctx.leave_layer()` after.
pub fn dock_panel(ctx: &mut UiContext, layer: &str, rect: Rect, title: &str) -> (bool, Rect) {
    ctx.register_layer(layer, rect);
    ctx.enter_layer(layer);
    draw_panel(rect, Some(title), PANEL_BG);

    let close_rect = Rect::new(rect.right() - PANEL_TITLE_HEIGHT, rect.y, PANEL_TITLE_HEIGHT, PANEL_TITLE_HEIGHT);
    let closed = close_button(ctx, close_rect);
    (closed, panel_content_rect(rect, true))
}
