use super::{draw_modal_frame, BUTTON_WIDTH};
use crate::ui::theme::*;
use crate::ui::{text_button, Rect, UiContext};
use macroquad::prelude::*;

const PROJECT_URL: &str = "https://github.com/OpenDiablo2/HellSpawner";
const TAB_WIDTH: f32 = 90.0;

const CREDITS: &[&str] = &[
    "HellSpawner is built by the OpenDiablo 2 community.",
    "",
    "Thanks to everyone who documented the Diablo II file formats,",
    "and to the contributors of the OpenDiablo 2 engine.",
    "",
    "Diablo II and its assets are property of Blizzard Entertainment.",
    "This tool ships none of them.",
];

const LICENSES: &[&str] = &[
    "HellSpawner is free software released under the",
    "GNU General Public License, version 3.",
    "",
    "Third party crates:",
    "  macroquad, image, flate2 (MIT / Apache-2.0)",
    "  serde, ron, serde_json, thiserror, log (MIT / Apache-2.0)",
    "  flexi_logger, rfd, dirs, webbrowser (MIT / Apache-2.0)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AboutTab {
    Credits,
    Licenses,
}

pub struct AboutDialog {
    visible: bool,
    tab: AboutTab,
}

impl AboutDialog {
    pub fn new() -> Self {
        Self { visible: false, tab: AboutTab::Credits }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.tab = AboutTab::Credits;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn draw(&mut self, ctx: &mut UiContext) {
        if !self.visible {
            return;
        }

        let layout = draw_modal_frame(ctx, "About HellSpawner", 560.0, 380.0);
        let body = layout.body;

        draw_text("HellSpawner", body.x, body.y + 22.0, 28.0, ACCENT_COLOR);
        draw_text("The OpenDiablo 2 Toolset", body.x, body.y + 44.0, FONT_SIZE_CONTENT, TEXT_COLOR);
        let version = format!("Version {}", env!("CARGO_PKG_VERSION"));
        draw_text(&version, body.x, body.y + 62.0, FONT_SIZE_SMALL, TEXT_DIM);

        let tabs_y = body.y + 76.0;
        for (index, (tab, label)) in [(AboutTab::Credits, "Credits"), (AboutTab::Licenses, "Licenses")]
            .into_iter()
            .enumerate()
        {
            let rect = Rect::new(body.x + index as f32 * (TAB_WIDTH + 4.0), tabs_y, TAB_WIDTH, 24.0);
            let color = if self.tab == tab { ACCENT_COLOR } else { HEADER_COLOR };
            if text_button(ctx, rect, label, color) {
                self.tab = tab;
            }
        }

        let text = Rect::new(body.x, tabs_y + 30.0, body.w, body.bottom() - tabs_y - 30.0);
        draw_rectangle(text.x, text.y, text.w, text.h, BG_COLOR);
        let lines = match self.tab {
            AboutTab::Credits => CREDITS,
            AboutTab::Licenses => LICENSES,
        };
        for (i, line) in lines.iter().enumerate() {
            let y = text.y + 18.0 + i as f32 * 17.0;
            if y > text.bottom() {
                break;
            }
            draw_text(line, text.x + 8.0, y, FONT_SIZE_CONTENT, TEXT_COLOR);
        }

        let footer = layout.footer;
        let link = Rect::new(footer.x, footer.y, BUTTON_WIDTH * 1.6, footer.h);
        if text_button(ctx, link, "Project Page", HEADER_COLOR) {
            if let Err(e) = webbrowser::open(PROJECT_URL) {
                log::warn!("Could not open {}: {}", PROJECT_URL, e);
            }
        }
        let close = Rect::new(footer.right() - BUTTON_WIDTH, footer.y, BUTTON_WIDTH, footer.h);
        if text_button(ctx, close, "Close", HEADER_COLOR) || layout.close_clicked {
            self.hide();
        }

        ctx.leave_layer();
    }
}

impl Default for AboutDialog {
    fn default() -> Self {
        Self::new()
    }
}
