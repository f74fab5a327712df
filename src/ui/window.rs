//! Floating windows
//!
//! Title bar with close button, drag to move, click to focus. Windows do
//! not decide stacking themselves; they report when they want to be
//! raised and the owner reorders its draw list.

use super::theme::*;
use super::{fit_text, Rect, UiContext};
use macroquad::prelude::*;

pub const TITLE_BAR_HEIGHT: f32 = 22.0;
const WINDOW_LAYER_PREFIX: &str = "window:";
const CONTENT_PADDING: f32 = 6.0;

pub struct WindowResponse {
    pub close_clicked: bool,
    pub content: Rect,
}

#[derive(Debug, Clone)]
pub struct FloatingWindow {
    pub title: String,
    pub rect: Rect,
    layer: String,
    visible: bool,
    focused: bool,
    focus_requested: bool,
    raised: bool,
    drag_offset: (f32, f32),
}

impl FloatingWindow {
    /// A window whose content area is `content_w` x `content_h`
    pub fn new(id: &str, title: impl Into<String>, content_w: f32, content_h: f32) -> Self {
        Self {
            title: title.into(),
            rect: Rect::new(
                0.0,
                0.0,
                content_w + CONTENT_PADDING * 2.0,
                content_h + TITLE_BAR_HEIGHT + CONTENT_PADDING * 2.0,
            ),
            layer: format!("{WINDOW_LAYER_PREFIX}{id}"),
            visible: true,
            focused: false,
            focus_requested: false,
            raised: false,
            drag_offset: (0.0, 0.0),
        }
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.focused = false;
        self.focus_requested = false;
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// Focus and raise on the next update
    pub fn request_focus(&mut self) {
        self.focus_requested = true;
    }

    pub fn focus_requested(&self) -> bool {
        self.focus_requested
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Whether the window asked to move to the top since the last call
    pub fn take_raised(&mut self) -> bool {
        std::mem::take(&mut self.raised)
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.rect.x = x;
        self.rect.y = y;
    }

    pub fn content_rect(&self) -> Rect {
        self.rect.remaining_after_top(TITLE_BAR_HEIGHT).pad(CONTENT_PADDING)
    }

    fn close_rect(&self) -> Rect {
        Rect::new(self.rect.right() - TITLE_BAR_HEIGHT, self.rect.y, TITLE_BAR_HEIGHT, TITLE_BAR_HEIGHT)
    }

    /// Handle focus, dragging and the close button. The caller must have
    /// entered this window's layer.
    pub fn update(&mut self, ctx: &mut UiContext, bounds: Rect) -> WindowResponse {
        if self.focus_requested {
            self.focus_requested = false;
            self.focused = true;
            self.raised = true;
        }

        if ctx.mouse.left_pressed {
            if ctx.hovered(&self.rect) {
                self.focused = true;
                self.raised = true;
            } else if ctx.pointer_is_free() || ctx.pointer_layer_starts_with(WINDOW_LAYER_PREFIX) {
                // Clicks on menus and docked panels keep editor focus
                self.focused = false;
            }
        }

        let close_clicked = ctx.clicked(&self.close_rect());
        let title_bar = self.rect.slice_top(TITLE_BAR_HEIGHT);
        if !close_clicked && ctx.clicked(&title_bar) {
            ctx.start_drag("title");
            self.drag_offset = (ctx.mouse.x - self.rect.x, ctx.mouse.y - self.rect.y);
        }
        if ctx.is_dragging("title") {
            self.rect.x = (ctx.mouse.x - self.drag_offset.0).round();
            self.rect.y = (ctx.mouse.y - self.drag_offset.1).round();
        }
        self.rect = self.rect.clamped_into(&bounds, 40.0);

        WindowResponse { close_clicked, content: self.content_rect() }
    }

    /// Draw the frame and register the window's pointer layer
    pub fn draw(&self, ctx: &mut UiContext) {
        ctx.register_layer(&self.layer, self.rect);
        let r = self.rect;

        draw_rectangle(r.x + 3.0, r.y + 3.0, r.w, r.h, Color::new(0.0, 0.0, 0.0, 0.35));
        draw_rectangle(r.x, r.y, r.w, r.h, PANEL_BG);

        let header = if self.focused { HEADER_FOCUSED } else { HEADER_COLOR };
        draw_rectangle(r.x, r.y, r.w, TITLE_BAR_HEIGHT, header);
        let title = fit_text(&self.title, r.w - TITLE_BAR_HEIGHT - 12.0, FONT_SIZE_CONTENT);
        let title_color = if self.focused { WHITE } else { TEXT_COLOR };
        draw_text(&title, r.x + 6.0, r.y + 15.0, FONT_SIZE_CONTENT, title_color);

        let close = self.close_rect();
        let close_hovered = ctx.layer_has_pointer(&self.layer) && ctx.mouse.inside(&close);
        if close_hovered {
            draw_rectangle(close.x, close.y, close.w, close.h, Color::from_rgba(120, 40, 40, 255));
        }
        let inset = 7.0;
        draw_line(close.x + inset, close.y + inset, close.right() - inset, close.bottom() - inset, 1.5, title_color);
        draw_line(close.right() - inset, close.y + inset, close.x + inset, close.bottom() - inset, 1.5, title_color);

        let border = if self.focused { ACCENT_COLOR } else { BORDER_COLOR };
        draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, border);
    }
}
