//! Basic UI widgets

use super::theme::*;
use super::{Rect, UiContext};
use macroquad::prelude::*;

/// Simple toolbar layout helper
pub struct Toolbar {
    rect: Rect,
    cursor_x: f32,
    spacing: f32,
}

impl Toolbar {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            cursor_x: rect.x + 4.0,
            spacing: 4.0,
        }
    }

    /// Add a text button sized to its label
    pub fn button(&mut self, ctx: &mut UiContext, text: &str, enabled: bool) -> bool {
        let width = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0).width + 16.0;
        let rect = Rect::new(self.cursor_x.round(), (self.rect.y + 2.0).round(), width, self.rect.h - 4.0);
        self.cursor_x += width + self.spacing;
        text_button_enabled(ctx, rect, text, HEADER_COLOR, enabled)
    }
}

/// Draw a text button
pub fn text_button(ctx: &mut UiContext, rect: Rect, text: &str, bg_color: Color) -> bool {
    text_button_enabled(ctx, rect, text, bg_color, true)
}

/// Draw a text button with enabled state
pub fn text_button_enabled(ctx: &mut UiContext, rect: Rect, text: &str, bg_color: Color, enabled: bool) -> bool {
    let hovered = enabled && ctx.hovered(&rect);
    let clicked = enabled && ctx.clicked(&rect);

    let color = if !enabled {
        Color::from_rgba(50, 50, 55, 255)
    } else if hovered {
        Color::new(bg_color.r * 1.3, bg_color.g * 1.3, bg_color.b * 1.3, bg_color.a)
    } else {
        bg_color
    };

    draw_rounded_rect(rect.x, rect.y, rect.w, rect.h, 3.0, color);

    let text_color = if enabled { WHITE } else { Color::from_rgba(100, 100, 100, 255) };
    let dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
    let tx = rect.x + (rect.w - dims.width) / 2.0;
    let ty = rect.y + (rect.h + dims.height) / 2.0 - 1.0;
    draw_text(text, tx.round(), ty.round(), FONT_SIZE_CONTENT, text_color);

    clicked
}

/// Draw a close button (X)
pub fn close_button(ctx: &mut UiContext, rect: Rect) -> bool {
    let hovered = ctx.hovered(&rect);
    if hovered {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, Color::from_rgba(120, 40, 40, 255));
    }

    let inset = rect.w.min(rect.h) * 0.3;
    let color = if hovered { WHITE } else { TEXT_COLOR };
    draw_line(rect.x + inset, rect.y + inset, rect.right() - inset, rect.bottom() - inset, 1.5, color);
    draw_line(rect.right() - inset, rect.y + inset, rect.x + inset, rect.bottom() - inset, 1.5, color);

    ctx.clicked(&rect)
}

/// Checkbox with a label to its right. Returns true when toggled.
pub fn checkbox(ctx: &mut UiContext, rect: Rect, label: &str, value: &mut bool) -> bool {
    let box_size = 14.0;
    let box_rect = Rect::new(rect.x, rect.center_y() - box_size / 2.0, box_size, box_size);

    let hovered = ctx.hovered(&rect);
    draw_rectangle(box_rect.x, box_rect.y, box_rect.w, box_rect.h, ROW_ODD);
    draw_rectangle_lines(
        box_rect.x,
        box_rect.y,
        box_rect.w,
        box_rect.h,
        1.0,
        if hovered { ACCENT_COLOR } else { BORDER_COLOR },
    );
    if *value {
        let inner = box_rect.pad(3.0);
        draw_rectangle(inner.x, inner.y, inner.w, inner.h, ACCENT_COLOR);
    }
    draw_text(label, rect.x + box_size + 8.0, rect.center_y() + 5.0, FONT_SIZE_CONTENT, TEXT_COLOR);

    let toggled = ctx.clicked(&rect);
    if toggled {
        *value = !*value;
    }
    toggled
}

/// A full-width list row. Returns true when clicked.
pub fn selectable_row(ctx: &mut UiContext, rect: Rect, text: &str, selected: bool, index: usize) -> bool {
    let background = if selected {
        ROW_SELECTED
    } else if ctx.hovered(&rect) {
        ROW_HOVER
    } else if index % 2 == 0 {
        ROW_EVEN
    } else {
        ROW_ODD
    };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, background);
    draw_text(
        &fit_text(text, rect.w - 12.0, FONT_SIZE_CONTENT),
        rect.x + 6.0,
        rect.center_y() + 5.0,
        FONT_SIZE_CONTENT,
        TEXT_COLOR,
    );
    ctx.clicked(&rect)
}

/// Small disclosure triangle used by trees and collapsible headers
pub fn draw_disclosure(x: f32, y: f32, expanded: bool, color: Color) {
    let size = 5.0;
    if expanded {
        draw_triangle(
            vec2(x - 2.0, y - 3.0),
            vec2(x + size + 2.0, y - 3.0),
            vec2(x + size / 2.0, y + 4.0),
            color,
        );
    } else {
        draw_triangle(vec2(x, y - size), vec2(x, y + size), vec2(x + size, y), color);
    }
}

/// Truncate `text` with ".." so it fits in `max_width`
pub fn fit_text(text: &str, max_width: f32, font_size: f32) -> String {
    if measure_text(text, None, font_size as u16, 1.0).width <= max_width {
        return text.to_string();
    }
    let mut fitted: String = text.to_string();
    while !fitted.is_empty() {
        fitted.pop();
        let candidate = format!("{fitted}..");
        if measure_text(&candidate, None, font_size as u16, 1.0).width <= max_width {
            return candidate;
        }
    }
    String::new()
}

/// Draw a rounded rectangle (simple approximation using overlapping rects)
pub fn draw_rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32, color: Color) {
    let r = r.min(w / 2.0).min(h / 2.0);
    draw_rectangle(x + r, y, w - r * 2.0, h, color);
    draw_rectangle(x, y + r, w, h - r * 2.0, color);
    draw_circle(x + r, y + r, r, color);
    draw_circle(x + w - r, y + r, r, color);
    draw_circle(x + r, y + h - r, r, color);
    draw_circle(x + w - r, y + h - r, r, color);
}
