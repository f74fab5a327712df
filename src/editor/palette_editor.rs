//! Palette viewer: the 256 colors as a 16x16 grid
//!
//! The grid is rendered to an image once, in the background, and cached
//! as a texture owned by the editor.

use super::{EditorBase, EditorFrame, EditorWindow};
use crate::formats::{FormatError, Palette, Rgb};
use crate::project::PathEntry;
use crate::texture::TextureKey;
use crate::ui::theme::*;
use crate::ui::Rect;
use image::{Rgba, RgbaImage};
use macroquad::prelude::*;

const GRID_CELLS: u32 = 16;
const CELL_SIZE: u32 = 12;
const GUTTER: u32 = 1;
const GRID_PIXELS: u32 = GRID_CELLS * (CELL_SIZE + GUTTER) + GUTTER;
const GRID_SCALE: f32 = 2.0;
const INFO_HEIGHT: f32 = 40.0;
const GRID_TEXTURE: &str = "PaletteGridWidget";

pub struct PaletteEditor {
    base: EditorBase,
    data: Vec<u8>,
    palette: Palette,
    hovered: Option<u8>,
    selected: Option<u8>,
}

impl PaletteEditor {
    pub fn create(path: &PathEntry, data: Vec<u8>) -> Result<Box<dyn EditorWindow>, FormatError> {
        let palette = Palette::decode(&data)?;
        let side = GRID_PIXELS as f32 * GRID_SCALE;
        Ok(Box::new(Self {
            base: EditorBase::new(path, &data, side, side + INFO_HEIGHT),
            data,
            palette,
            hovered: None,
            selected: None,
        }))
    }

    fn grid_rect(content: Rect) -> Rect {
        let side = GRID_PIXELS as f32 * GRID_SCALE;
        Rect::new(content.x, content.y, side, side)
    }

    fn texture_key(&self) -> TextureKey {
        TextureKey::new(self.id(), GRID_TEXTURE)
    }
}

/// Palette index under a point given in unscaled grid pixels. Gutters
/// belong to no cell.
pub fn cell_at(x: f32, y: f32) -> Option<u8> {
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let stride = (CELL_SIZE + GUTTER) as f32;
    let (col, row) = ((x / stride) as u32, (y / stride) as u32);
    if col >= GRID_CELLS || row >= GRID_CELLS {
        return None;
    }
    let in_gutter = x - col as f32 * stride < GUTTER as f32 || y - row as f32 * stride < GUTTER as f32;
    if in_gutter {
        return None;
    }
    Some((row * GRID_CELLS + col) as u8)
}

/// Render the palette as swatches separated by dark gutters
pub fn palette_grid_image(colors: &[Rgb; 256]) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(GRID_PIXELS, GRID_PIXELS, Rgba([24, 24, 28, 255]));
    for (index, color) in colors.iter().enumerate() {
        let col = index as u32 % GRID_CELLS;
        let row = index as u32 / GRID_CELLS;
        let x0 = GUTTER + col * (CELL_SIZE + GUTTER);
        let y0 = GUTTER + row * (CELL_SIZE + GUTTER);
        for y in y0..y0 + CELL_SIZE {
            for x in x0..x0 + CELL_SIZE {
                image.put_pixel(x, y, Rgba([color.r, color.g, color.b, 255]));
            }
        }
    }
    image
}

fn describe(index: u8, color: Rgb) -> String {
    format!(
        "Index {index}: R {} G {} B {} (#{:02X}{:02X}{:02X})",
        color.r, color.g, color.b, color.r, color.g, color.b
    )
}

impl EditorWindow for PaletteEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EditorBase {
        &mut self.base
    }

    fn build(&mut self, frame: &mut EditorFrame<'_>) {
        let colors = *self.palette.colors();
        frame
            .textures
            .request(&self.texture_key(), move |_| Ok(palette_grid_image(&colors)));

        let grid = Self::grid_rect(frame.content);
        let mouse = frame.ctx.mouse;
        self.hovered = if frame.ctx.hovered(&grid) {
            cell_at((mouse.x - grid.x) / GRID_SCALE, (mouse.y - grid.y) / GRID_SCALE)
        } else {
            None
        };
        if frame.ctx.clicked(&grid) && self.hovered.is_some() {
            self.selected = self.hovered;
        }
    }

    fn render(&self, frame: &mut EditorFrame<'_>) {
        let grid = Self::grid_rect(frame.content);
        match frame.textures.get(&self.texture_key()) {
            Some(texture) => draw_texture_ex(
                texture,
                grid.x,
                grid.y,
                WHITE,
                DrawTextureParams { dest_size: Some(vec2(grid.w, grid.h)), ..Default::default() },
            ),
            None => {
                draw_text("Loading palette...", grid.x + 8.0, grid.y + 20.0, FONT_SIZE_CONTENT, TEXT_DIM);
            }
        }

        let stride = (CELL_SIZE + GUTTER) as f32 * GRID_SCALE;
        let outline = |index: u8, color: Color| {
            let x = grid.x + (index as u32 % GRID_CELLS) as f32 * stride + GRID_SCALE;
            let y = grid.y + (index as u32 / GRID_CELLS) as f32 * stride + GRID_SCALE;
            let size = CELL_SIZE as f32 * GRID_SCALE;
            draw_rectangle_lines(x - 1.0, y - 1.0, size + 2.0, size + 2.0, 2.0, color);
        };
        if let Some(index) = self.selected {
            outline(index, ACCENT_COLOR);
        }
        if let Some(index) = self.hovered {
            outline(index, WHITE);
        }

        let info_y = grid.bottom() + 18.0;
        if let Some(index) = self.hovered.or(self.selected) {
            let color = self.palette.color(index);
            draw_rectangle(grid.x, info_y - 12.0, 16.0, 16.0, Color::from_rgba(color.r, color.g, color.b, 255));
            draw_text(&describe(index, color), grid.x + 24.0, info_y, FONT_SIZE_CONTENT, TEXT_COLOR);
        } else {
            draw_text("Hover a color to inspect it", grid.x, info_y, FONT_SIZE_CONTENT, TEXT_DIM);
        }
    }

    fn generate_save_data(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn menu_title(&self) -> &'static str {
        "Palette Editor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{TextureLoader, TextureState};
    use crate::ui::{MouseState, UiContext};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_requests_grid_until_ready() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("act1.dat");
        fs::write(&path, vec![0u8; 768]).unwrap();
        let mut editor = PaletteEditor::create(&PathEntry::project_file(&path), fs::read(&path).unwrap()).unwrap();

        let mut ctx = UiContext::new();
        ctx.begin_frame(MouseState::default());
        let mut textures: TextureLoader<Texture2D> = TextureLoader::new();
        let mut frame = EditorFrame { ctx: &mut ctx, content: Rect::new(0.0, 0.0, 600.0, 600.0), textures: &mut textures };
        editor.build(&mut frame);

        let key = TextureKey::new(editor.id(), GRID_TEXTURE);
        assert_eq!(textures.state(&key), TextureState::Loading);
        assert!(textures.get(&key).is_none());
    }

    #[test]
    fn test_cell_lookup_skips_gutters() {
        assert_eq!(cell_at(0.5, 5.0), None);
        assert_eq!(cell_at(1.0, 1.0), Some(0));
        assert_eq!(cell_at(14.0, 1.0), Some(1));
        assert_eq!(cell_at(1.0, 14.0), Some(16));
        assert_eq!(cell_at(GRID_PIXELS as f32 - 2.0, GRID_PIXELS as f32 - 2.0), Some(255));
        assert_eq!(cell_at(GRID_PIXELS as f32 + 1.0, 1.0), None);
        assert_eq!(cell_at(-1.0, 1.0), None);
    }

    #[test]
    fn test_grid_image_places_swatches() {
        let mut colors = [Rgb::default(); 256];
        colors[17] = Rgb::new(200, 10, 20);
        let image = palette_grid_image(&colors);
        assert_eq!(image.dimensions(), (GRID_PIXELS, GRID_PIXELS));

        let x = GUTTER + (CELL_SIZE + GUTTER);
        assert_eq!(image.get_pixel(x, x).0, [200, 10, 20, 255]);
        assert_eq!(image.get_pixel(x + CELL_SIZE - 1, x + CELL_SIZE - 1).0, [200, 10, 20, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [24, 24, 28, 255]);
    }

    #[test]
    fn test_describe_formats_hex() {
        assert_eq!(describe(5, Rgb::new(255, 0, 16)), "Index 5: R 255 G 0 B 16 (#FF0010)");
    }
}
