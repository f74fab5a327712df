//! Modal dialogs
//!
//! Each dialog darkens the screen and claims the whole pointer while open,
//! so nothing underneath reacts until it is closed.

mod about;
mod preferences;
mod project_properties;

pub use about::AboutDialog;
pub use preferences::PreferencesDialog;
pub use project_properties::ProjectPropertiesDialog;

use crate::ui::theme::*;
use crate::ui::{close_button, text_button, Rect, UiContext};
use macroquad::prelude::*;

pub const DIALOG_LAYER: &str = "dialog";
const HEADER_HEIGHT: f32 = 32.0;
const FOOTER_HEIGHT: f32 = 40.0;
const PADDING: f32 = 12.0;
pub const BUTTON_WIDTH: f32 = 84.0;
pub const FIELD_HEIGHT: f32 = 24.0;

/// Body and footer of a modal frame
pub struct ModalLayout {
    pub close_clicked: bool,
    pub body: Rect,
    pub footer: Rect,
}

/// Draw the modal backdrop and frame, sized to at most `width` x `height`.
/// Leaves the dialog layer entered; call `ctx.leave_layer()` when done.
pub fn draw_modal_frame(ctx: &mut UiContext, title: &str, width: f32, height: f32) -> ModalLayout {
    let screen = Rect::screen(screen_width(), screen_height());
    ctx.register_layer(DIALOG_LAYER, screen);
    ctx.enter_layer(DIALOG_LAYER);

    draw_rectangle(screen.x, screen.y, screen.w, screen.h, MODAL_SHADE);

    let dialog = screen.centered(width.min(screen.w - 20.0), height.min(screen.h - 20.0));
    draw_rectangle(dialog.x, dialog.y, dialog.w, dialog.h, PANEL_BG);
    draw_rectangle_lines(dialog.x, dialog.y, dialog.w, dialog.h, 2.0, BORDER_COLOR);

    draw_rectangle(dialog.x, dialog.y, dialog.w, HEADER_HEIGHT, HEADER_COLOR);
    draw_text(title, dialog.x + PADDING, dialog.y + 21.0, FONT_SIZE_HEADER, WHITE);

    let close_rect = Rect::new(dialog.right() - HEADER_HEIGHT, dialog.y, HEADER_HEIGHT, HEADER_HEIGHT);
    let close_clicked = close_button(ctx, close_rect);

    let inner = dialog.remaining_after_top(HEADER_HEIGHT);
    let footer = inner.slice_bottom(FOOTER_HEIGHT).pad(8.0);
    let body = inner.remaining_after_bottom(FOOTER_HEIGHT).pad(PADDING);
    ModalLayout { close_clicked, body, footer }
}

/// Save / Cancel buttons right-aligned in `footer`. Returns (save, cancel).
pub fn save_cancel_buttons(ctx: &mut UiContext, footer: Rect, save_enabled: bool) -> (bool, bool) {
    let cancel_rect = Rect::new(footer.right() - BUTTON_WIDTH, footer.y, BUTTON_WIDTH, footer.h);
    let save_rect = Rect::new(cancel_rect.x - BUTTON_WIDTH - 8.0, footer.y, BUTTON_WIDTH, footer.h);
    let save = crate::ui::text_button_enabled(ctx, save_rect, "Save", ACCENT_COLOR, save_enabled);
    let cancel = text_button(ctx, cancel_rect, "Cancel", HEADER_COLOR);
    (save, cancel)
}

/// A label above a field. Returns the field rect and advances `y`.
pub fn labeled_field(body: Rect, y: &mut f32, label: &str) -> Rect {
    draw_text(label, body.x, *y + 12.0, FONT_SIZE_CONTENT, TEXT_DIM);
    let field = Rect::new(body.x, *y + 18.0, body.w, FIELD_HEIGHT);
    *y = field.bottom() + 10.0;
    field
}
