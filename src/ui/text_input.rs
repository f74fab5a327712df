//! Single-line text input

use super::theme::*;
use super::{Rect, UiContext};
use macroquad::prelude::*;

/// State for a text input field
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    pub text: String,
    /// Cursor position (byte index)
    pub cursor: usize,
    /// Whole text selected (Ctrl+A)
    pub all_selected: bool,
    pub blink_timer: f32,
    pub focused: bool,
}

impl TextInputState {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self {
            text,
            cursor,
            all_selected: false,
            blink_timer: 0.0,
            focused: false,
        }
    }

    /// Replace the contents, moving the cursor to the end
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
        self.all_selected = false;
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.text.len())
    }

    fn take_selection(&mut self) -> bool {
        if self.all_selected {
            self.text.clear();
            self.cursor = 0;
            self.all_selected = false;
            return true;
        }
        false
    }

    pub fn move_left(&mut self) {
        self.all_selected = false;
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.all_selected = false;
        self.cursor = self.next_boundary();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.take_selection();
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.take_selection() || self.cursor == 0 {
            return;
        }
        let prev = self.prev_boundary();
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
    }

    pub fn delete(&mut self) {
        if self.take_selection() || self.cursor >= self.text.len() {
            return;
        }
        let next = self.next_boundary();
        self.text.drain(self.cursor..next);
    }

    /// Handle keyboard input, returns true if text changed
    pub fn handle_input(&mut self) -> bool {
        let old_text = self.text.clone();
        let old_cursor = self.cursor;
        self.blink_timer += get_frame_time();

        let ctrl = is_key_down(KeyCode::LeftControl)
            || is_key_down(KeyCode::RightControl)
            || is_key_down(KeyCode::LeftSuper)
            || is_key_down(KeyCode::RightSuper);

        if is_key_pressed(KeyCode::Left) {
            self.move_left();
        }
        if is_key_pressed(KeyCode::Right) {
            self.move_right();
        }
        if is_key_pressed(KeyCode::Home) {
            self.all_selected = false;
            self.cursor = 0;
        }
        if is_key_pressed(KeyCode::End) {
            self.all_selected = false;
            self.cursor = self.text.len();
        }
        if ctrl && is_key_pressed(KeyCode::A) {
            self.all_selected = true;
            self.cursor = self.text.len();
        }
        if is_key_pressed(KeyCode::Backspace) {
            self.backspace();
        }
        if is_key_pressed(KeyCode::Delete) {
            self.delete();
        }

        while let Some(ch) = get_char_pressed() {
            // Skip control characters and anything typed with Ctrl held
            if !ctrl && ch >= ' ' && ch != '\u{7f}' {
                self.insert_char(ch);
            }
        }

        let changed = self.text != old_text;
        if changed || self.cursor != old_cursor {
            self.blink_timer = 0.0;
        }
        changed
    }
}

/// Draw a text input field and handle focus and keyboard input.
/// Returns true if the text changed.
pub fn draw_text_input(ctx: &mut UiContext, rect: Rect, state: &mut TextInputState) -> bool {
    if ctx.mouse.left_pressed {
        let was_focused = state.focused;
        state.focused = ctx.hovered(&rect);
        if state.focused && !was_focused {
            state.cursor = state.text.len();
            state.all_selected = false;
        }
    }

    let font_size = FONT_SIZE_CONTENT;
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, ROW_ODD);
    draw_rectangle_lines(
        rect.x,
        rect.y,
        rect.w,
        rect.h,
        1.0,
        if state.focused { ACCENT_COLOR } else { BORDER_COLOR },
    );

    let changed = if state.focused {
        ctx.set_text_editing();
        state.handle_input()
    } else {
        false
    };

    let padding = 6.0;
    let text_x = rect.x + padding;
    let text_y = rect.y + (rect.h + font_size * 0.7) / 2.0;

    if state.all_selected && !state.text.is_empty() {
        let width = measure_text(&state.text, None, font_size as u16, 1.0).width;
        draw_rectangle(text_x, rect.y + 4.0, width, rect.h - 8.0, Color::new(0.78, 0.33, 0.12, 0.4));
    }

    draw_text(&state.text, text_x, text_y, font_size, TEXT_COLOR);

    if state.focused && (state.blink_timer % 1.0) < 0.5 {
        let offset = measure_text(&state.text[..state.cursor], None, font_size as u16, 1.0).width;
        let cursor_x = text_x + offset;
        draw_line(cursor_x, rect.y + 5.0, cursor_x, rect.bottom() - 5.0, 1.5, WHITE);
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_respects_utf8_boundaries() {
        let mut state = TextInputState::new("añb");
        state.move_left();
        state.backspace();
        assert_eq!(state.text, "ab");
        assert_eq!(state.cursor, 1);
        state.insert_char('é');
        assert_eq!(state.text, "aéb");
        state.delete();
        assert_eq!(state.text, "aé");
    }

    #[test]
    fn test_typing_replaces_select_all() {
        let mut state = TextInputState::new("old name");
        state.all_selected = true;
        state.insert_char('x');
        assert_eq!(state.text, "x");
        assert_eq!(state.cursor, 1);
    }
}
