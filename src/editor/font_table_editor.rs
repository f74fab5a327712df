//! Font table viewer: one row per glyph, ordered by sprite frame

use super::{EditorBase, EditorFrame, EditorWindow};
use crate::formats::{FontGlyph, FontTable, FormatError};
use crate::project::PathEntry;
use crate::ui::theme::*;
use crate::ui::Rect;
use macroquad::prelude::*;

const ROW_HEIGHT: f32 = 20.0;
const HEADER_HEIGHT: f32 = 22.0;
const COLUMNS: [(&str, f32); 3] = [("Index", 0.0), ("Character", 90.0), ("Width (px)", 200.0)];

pub struct FontTableEditor {
    base: EditorBase,
    data: Vec<u8>,
    rows: Vec<FontGlyph>,
    scroll: f32,
    hovered_row: Option<usize>,
}

impl FontTableEditor {
    pub fn create(path: &PathEntry, data: Vec<u8>) -> Result<Box<dyn EditorWindow>, FormatError> {
        let table = FontTable::decode(&data)?;
        log::debug!("{}: {} glyphs", path.name, table.glyphs().len());
        Ok(Box::new(Self {
            base: EditorBase::new(path, &data, 320.0, 400.0),
            data,
            rows: table.glyphs_by_frame(),
            scroll: 0.0,
            hovered_row: None,
        }))
    }

    fn body_rect(content: Rect) -> Rect {
        content.remaining_after_top(HEADER_HEIGHT)
    }

    fn max_scroll(&self, body: &Rect) -> f32 {
        (self.rows.len() as f32 * ROW_HEIGHT - body.h).max(0.0)
    }
}

/// Printable form of a glyph's character
fn display_char(glyph: &FontGlyph) -> String {
    let ch = glyph.character();
    if ch.is_control() || ch == ' ' {
        format!("U+{:04X}", glyph.code)
    } else {
        ch.to_string()
    }
}

impl EditorWindow for FontTableEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EditorBase {
        &mut self.base
    }

    fn build(&mut self, frame: &mut EditorFrame<'_>) {
        let body = Self::body_rect(frame.content);
        let delta = frame.ctx.scroll_in(&body);
        if delta != 0.0 {
            self.scroll -= delta.signum() * ROW_HEIGHT * 3.0;
        }
        self.scroll = self.scroll.clamp(0.0, self.max_scroll(&body));

        self.hovered_row = if frame.ctx.hovered(&body) {
            let row = ((frame.ctx.mouse.y - body.y + self.scroll) / ROW_HEIGHT) as usize;
            (row < self.rows.len()).then_some(row)
        } else {
            None
        };
    }

    fn render(&self, frame: &mut EditorFrame<'_>) {
        let content = frame.content;
        draw_rectangle(content.x, content.y, content.w, HEADER_HEIGHT, HEADER_COLOR);
        for (title, offset) in COLUMNS {
            draw_text(title, content.x + offset + 6.0, content.y + 15.0, FONT_SIZE_CONTENT, TEXT_COLOR);
        }

        let body = Self::body_rect(content);
        if self.rows.is_empty() {
            draw_text("No glyphs", body.x + 6.0, body.y + 16.0, FONT_SIZE_CONTENT, TEXT_DIM);
            return;
        }

        let first = (self.scroll / ROW_HEIGHT) as usize;
        let mut y = body.y + first as f32 * ROW_HEIGHT - self.scroll;
        for (index, glyph) in self.rows.iter().enumerate().skip(first) {
            if y + ROW_HEIGHT > body.bottom() {
                break;
            }
            let background = if self.hovered_row == Some(index) {
                ROW_HOVER
            } else if index % 2 == 0 {
                ROW_EVEN
            } else {
                ROW_ODD
            };
            draw_rectangle(body.x, y, body.w, ROW_HEIGHT, background);

            let baseline = y + 14.0;
            let cells = [glyph.frame_index.to_string(), display_char(glyph), glyph.width.to_string()];
            for ((_, offset), text) in COLUMNS.iter().zip(cells) {
                draw_text(&text, body.x + offset + 6.0, baseline, FONT_SIZE_CONTENT, TEXT_COLOR);
            }
            y += ROW_HEIGHT;
        }

        if let Some(glyph) = self.hovered_row.and_then(|row| self.rows.get(row)) {
            let mouse = frame.ctx.mouse;
            frame.ctx.set_tooltip(
                &format!("Code {:#06X}, height {} px", glyph.code, glyph.height),
                mouse.x,
                mouse.y,
            );
        }
    }

    fn generate_save_data(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn menu_title(&self) -> &'static str {
        "Font Table Editor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(code: u16) -> FontGlyph {
        FontGlyph { code, width: 8, height: 12, frame_index: 0 }
    }

    #[test]
    fn test_display_char() {
        assert_eq!(display_char(&glyph(b'A' as u16)), "A");
        assert_eq!(display_char(&glyph(0x20)), "U+0020");
        assert_eq!(display_char(&glyph(0x0A)), "U+000A");
        assert_eq!(display_char(&glyph(0x00E9)), "é");
    }

    #[test]
    fn test_rejects_missing_signature() {
        let entry = PathEntry::project_file(std::path::Path::new("/tmp/font.tbl"));
        assert!(FontTableEditor::create(&entry, b"Nope00000000".to_vec()).is_err());
    }
}
