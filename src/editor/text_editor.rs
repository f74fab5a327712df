//! Read-only viewer for plain text files

use super::{EditorBase, EditorFrame, EditorWindow};
use crate::formats::FormatError;
use crate::project::PathEntry;
use crate::ui::theme::*;
use macroquad::prelude::*;

const LINE_HEIGHT: f32 = 16.0;
const GUTTER_WIDTH: f32 = 48.0;
const CHAR_WIDTH: f32 = 7.0;
const SCROLL_LINES: f32 = 3.0;

pub struct TextEditor {
    base: EditorBase,
    data: Vec<u8>,
    lines: Vec<String>,
    scroll: f32,
}

impl TextEditor {
    pub fn create(path: &PathEntry, data: Vec<u8>) -> Result<Box<dyn EditorWindow>, FormatError> {
        let lines = split_lines(&data);
        Ok(Box::new(Self {
            base: EditorBase::new(path, &data, 640.0, 420.0),
            data,
            lines,
            scroll: 0.0,
        }))
    }

    fn max_scroll(&self, view_height: f32) -> f32 {
        (self.lines.len() as f32 * LINE_HEIGHT - view_height).max(0.0)
    }
}

/// Lines with tabs expanded; invalid UTF-8 is replaced
fn split_lines(data: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(data)
        .lines()
        .map(|line| line.replace('\t', "    "))
        .collect()
}

impl EditorWindow for TextEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EditorBase {
        &mut self.base
    }

    fn build(&mut self, frame: &mut EditorFrame<'_>) {
        let view = frame.content;
        let delta = frame.ctx.scroll_in(&view);
        if delta != 0.0 {
            self.scroll -= delta.signum() * LINE_HEIGHT * SCROLL_LINES;
        }
        self.scroll = self.scroll.clamp(0.0, self.max_scroll(view.h));
    }

    fn render(&self, frame: &mut EditorFrame<'_>) {
        let view = frame.content;
        draw_rectangle(view.x, view.y, view.w, view.h, BG_COLOR);
        draw_rectangle(view.x, view.y, GUTTER_WIDTH, view.h, PANEL_BG);

        let max_chars = ((view.w - GUTTER_WIDTH - 8.0) / CHAR_WIDTH).max(0.0) as usize;
        let first = (self.scroll / LINE_HEIGHT) as usize;
        let mut y = view.y + first as f32 * LINE_HEIGHT - self.scroll;

        for (number, line) in self.lines.iter().enumerate().skip(first) {
            if y + LINE_HEIGHT > view.bottom() {
                break;
            }
            let baseline = y + LINE_HEIGHT - 4.0;
            draw_text(&(number + 1).to_string(), view.x + 4.0, baseline, FONT_SIZE_SMALL, TEXT_DIM);
            let visible: String = line.chars().take(max_chars).collect();
            draw_text(&visible, view.x + GUTTER_WIDTH + 6.0, baseline, FONT_SIZE_CONTENT, TEXT_COLOR);
            y += LINE_HEIGHT;
        }

        if self.lines.is_empty() {
            draw_text("(empty file)", view.x + GUTTER_WIDTH + 6.0, view.y + 14.0, FONT_SIZE_CONTENT, TEXT_DIM);
        }
    }

    fn generate_save_data(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn menu_title(&self) -> &'static str {
        "Text Viewer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_expands_tabs_and_handles_crlf() {
        let lines = split_lines(b"a\tb\r\nsecond\n");
        assert_eq!(lines, vec!["a    b".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let lines = split_lines(&[b'o', b'k', 0xFF]);
        assert_eq!(lines, vec!["ok\u{FFFD}".to_string()]);
    }
}
