//! DC6 sprite viewer
//!
//! Direction and frame are picked with arrow buttons. Frames are decoded
//! to images in the background and drawn scaled to fit the window.

use super::{EditorBase, EditorFrame, EditorWindow};
use crate::formats::{Dc6, FormatError, Palette};
use crate::project::PathEntry;
use crate::texture::{TextureError, TextureKey, TextureState};
use crate::ui::theme::*;
use crate::ui::{text_button_enabled, Rect};
use macroquad::prelude::*;

const CONTROLS_HEIGHT: f32 = 26.0;
const INFO_HEIGHT: f32 = 22.0;
const ARROW_WIDTH: f32 = 24.0;
const LABEL_WIDTH: f32 = 118.0;
const MIN_CONTENT_WIDTH: f32 = 360.0;
const MAX_CONTENT_SIZE: f32 = 720.0;

/// Rects for the selector buttons, in display order
struct Controls {
    direction_prev: Rect,
    direction_label: Rect,
    direction_next: Rect,
    frame_prev: Rect,
    frame_label: Rect,
    frame_next: Rect,
}

impl Controls {
    fn layout(content: Rect) -> Self {
        let y = content.y + 1.0;
        let h = CONTROLS_HEIGHT - 4.0;
        let mut x = content.x;
        let mut next = |w: f32| {
            let rect = Rect::new(x, y, w, h);
            x += w + 4.0;
            rect
        };
        let direction_prev = next(ARROW_WIDTH);
        let direction_label = next(LABEL_WIDTH);
        let direction_next = next(ARROW_WIDTH);
        next(6.0);
        let frame_prev = next(ARROW_WIDTH);
        let frame_label = next(LABEL_WIDTH);
        let frame_next = next(ARROW_WIDTH);
        Self { direction_prev, direction_label, direction_next, frame_prev, frame_label, frame_next }
    }
}

pub struct Dc6Editor {
    base: EditorBase,
    data: Vec<u8>,
    dc6: Dc6,
    palette: Palette,
    direction: u32,
    frame: u32,
}

impl Dc6Editor {
    pub fn create(path: &PathEntry, data: Vec<u8>) -> Result<Box<dyn EditorWindow>, FormatError> {
        Ok(Box::new(Self::new(path, data)?))
    }

    pub fn new(path: &PathEntry, data: Vec<u8>) -> Result<Self, FormatError> {
        let dc6 = Dc6::decode(&data)?;
        let (max_w, max_h) = dc6.max_frame_size();
        let width = (max_w as f32).clamp(MIN_CONTENT_WIDTH, MAX_CONTENT_SIZE);
        let height = (max_h as f32).min(MAX_CONTENT_SIZE) + CONTROLS_HEIGHT + INFO_HEIGHT;
        Ok(Self {
            base: EditorBase::new(path, &data, width, height),
            data,
            dc6,
            palette: Palette::grayscale(),
            direction: 0,
            frame: 0,
        })
    }

    fn texture_key(&self) -> TextureKey {
        TextureKey::new(self.id(), format!("DC6Viewer_{}_{}", self.direction, self.frame))
    }

    fn step(value: &mut u32, count: u32, forward: bool) {
        if forward && *value + 1 < count {
            *value += 1;
        } else if !forward && *value > 0 {
            *value -= 1;
        }
    }

    fn image_rect(content: Rect) -> Rect {
        content.remaining_after_top(CONTROLS_HEIGHT).slice_top((content.h - CONTROLS_HEIGHT - INFO_HEIGHT).max(0.0))
    }

    fn info_text(&self) -> String {
        match self.dc6.frame(self.direction, self.frame) {
            Some(frame) => format!(
                "{} x {}  offset ({}, {}){}",
                frame.width,
                frame.height,
                frame.offset_x,
                frame.offset_y,
                if frame.flipped != 0 { "  flipped" } else { "" }
            ),
            None => "No frame data".to_string(),
        }
    }
}

impl EditorWindow for Dc6Editor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EditorBase {
        &mut self.base
    }

    fn build(&mut self, frame: &mut EditorFrame<'_>) {
        let controls = Controls::layout(frame.content);
        let ctx = &*frame.ctx;
        if ctx.clicked(&controls.direction_prev) {
            Self::step(&mut self.direction, self.dc6.directions, false);
        }
        if ctx.clicked(&controls.direction_next) {
            Self::step(&mut self.direction, self.dc6.directions, true);
        }
        if ctx.clicked(&controls.frame_prev) {
            Self::step(&mut self.frame, self.dc6.frames_per_direction, false);
        }
        if ctx.clicked(&controls.frame_next) {
            Self::step(&mut self.frame, self.dc6.frames_per_direction, true);
        }

        if let Some(dc6_frame) = self.dc6.frame(self.direction, self.frame).cloned() {
            let palette = self.palette.clone();
            frame.textures.request(&self.texture_key(), move |cancel| {
                if cancel.is_cancelled() {
                    return Err(TextureError::Cancelled);
                }
                dc6_frame
                    .to_image(&palette)
                    .map_err(|e| TextureError::Generation(e.to_string()))
            });
        }
    }

    fn render(&self, frame: &mut EditorFrame<'_>) {
        let controls = Controls::layout(frame.content);
        let directions = self.dc6.directions;
        let frames = self.dc6.frames_per_direction;

        // Clicks are handled in build; these only draw
        text_button_enabled(frame.ctx, controls.direction_prev, "<", HEADER_COLOR, self.direction > 0);
        text_button_enabled(frame.ctx, controls.direction_next, ">", HEADER_COLOR, self.direction + 1 < directions);
        text_button_enabled(frame.ctx, controls.frame_prev, "<", HEADER_COLOR, self.frame > 0);
        text_button_enabled(frame.ctx, controls.frame_next, ">", HEADER_COLOR, self.frame + 1 < frames);

        for (rect, text) in [
            (controls.direction_label, format!("Direction {}/{}", self.direction + 1, directions)),
            (controls.frame_label, format!("Frame {}/{}", self.frame + 1, frames)),
        ] {
            let width = measure_text(&text, None, FONT_SIZE_CONTENT as u16, 1.0).width;
            draw_text(&text, rect.center_x() - width / 2.0, rect.center_y() + 5.0, FONT_SIZE_CONTENT, TEXT_COLOR);
        }

        let area = Self::image_rect(frame.content);
        draw_rectangle(area.x, area.y, area.w, area.h, BG_COLOR);

        let key = self.texture_key();
        match (frame.textures.get(&key), frame.textures.state(&key)) {
            (Some(texture), _) => {
                let (w, h) = (texture.width(), texture.height());
                let scale = (area.w / w).min(area.h / h).min(1.0).max(0.0);
                let (dw, dh) = ((w * scale).floor(), (h * scale).floor());
                draw_texture_ex(
                    texture,
                    (area.center_x() - dw / 2.0).round(),
                    (area.center_y() - dh / 2.0).round(),
                    WHITE,
                    DrawTextureParams { dest_size: Some(vec2(dw, dh)), ..Default::default() },
                );
            }
            (None, TextureState::Failed) => {
                draw_text("Could not decode frame", area.x + 8.0, area.y + 20.0, FONT_SIZE_CONTENT, TEXT_DIM);
            }
            (None, _) => {
                draw_text("Loading...", area.x + 8.0, area.y + 20.0, FONT_SIZE_CONTENT, TEXT_DIM);
            }
        }

        let info_y = area.bottom() + 16.0;
        draw_text(&self.info_text(), frame.content.x, info_y, FONT_SIZE_SMALL, TEXT_DIM);
    }

    fn generate_save_data(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn menu_title(&self) -> &'static str {
        "DC6 Editor"
    }
}
