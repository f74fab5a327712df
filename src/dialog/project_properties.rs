use super::{draw_modal_frame, labeled_field, save_cancel_buttons, BUTTON_WIDTH, FIELD_HEIGHT};
use crate::config::Config;
use crate::project::{Project, ProjectProperties};
use crate::ui::theme::*;
use crate::ui::{draw_text_input, selectable_row, text_button, text_button_enabled, Rect, TextInputState, UiContext};
use macroquad::prelude::*;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

const LIST_ROW_HEIGHT: f32 = 20.0;

/// `picked` relative to the auxiliary MPQ directory, or as given when it
/// lies outside it
pub fn relative_mpq_path(auxiliary_root: &Path, picked: &Path) -> String {
    picked
        .strip_prefix(auxiliary_root)
        .unwrap_or(picked)
        .to_string_lossy()
        .into_owned()
}

pub struct ProjectPropertiesDialog {
    visible: bool,
    name: TextInputState,
    description: TextInputState,
    author: TextInputState,
    auxiliary_mpqs: Vec<String>,
    selected: Option<usize>,
    auxiliary_root: PathBuf,
}

impl ProjectPropertiesDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            name: TextInputState::default(),
            description: TextInputState::default(),
            author: TextInputState::default(),
            auxiliary_mpqs: Vec::new(),
            selected: None,
            auxiliary_root: PathBuf::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self, project: &Project, config: &Config) {
        let properties = project.properties();
        self.name = TextInputState::new(properties.project_name);
        self.description = TextInputState::new(properties.description);
        self.author = TextInputState::new(properties.author);
        self.auxiliary_mpqs = properties.auxiliary_mpqs;
        self.selected = None;
        self.auxiliary_root = config.auxiliary_mpq_path.clone();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn properties(&self) -> ProjectProperties {
        ProjectProperties {
            project_name: self.name.text.trim().to_string(),
            description: self.description.text.clone(),
            author: self.author.text.clone(),
            auxiliary_mpqs: self.auxiliary_mpqs.clone(),
        }
    }

    /// Add an archive by its path on disk. Duplicates are ignored.
    pub fn add_mpq(&mut self, picked: &Path) {
        let relative = relative_mpq_path(&self.auxiliary_root, picked);
        if !self.auxiliary_mpqs.iter().any(|m| m.eq_ignore_ascii_case(&relative)) {
            self.auxiliary_mpqs.push(relative);
        }
    }

    pub fn remove_selected(&mut self) {
        if let Some(index) = self.selected.take() {
            if index < self.auxiliary_mpqs.len() {
                self.auxiliary_mpqs.remove(index);
            }
        }
    }

    /// Returns the new properties when the user saves
    pub fn draw(&mut self, ctx: &mut UiContext) -> Option<ProjectProperties> {
        if !self.visible {
            return None;
        }

        let layout = draw_modal_frame(ctx, "Project Properties", 520.0, 460.0);
        let body = layout.body;
        let mut y = body.y;

        let field = labeled_field(body, &mut y, "Project Name");
        draw_text_input(ctx, field, &mut self.name);
        let field = labeled_field(body, &mut y, "Description");
        draw_text_input(ctx, field, &mut self.description);
        let field = labeled_field(body, &mut y, "Author");
        draw_text_input(ctx, field, &mut self.author);

        draw_text("Auxiliary MPQs", body.x, y + 12.0, FONT_SIZE_CONTENT, TEXT_DIM);
        let list = Rect::new(body.x, y + 18.0, body.w, (body.bottom() - y - 18.0 - FIELD_HEIGHT - 8.0).max(0.0));
        draw_rectangle(list.x, list.y, list.w, list.h, BG_COLOR);
        draw_rectangle_lines(list.x, list.y, list.w, list.h, 1.0, BORDER_COLOR);
        let mut clicked_row = None;
        for (index, mpq) in self.auxiliary_mpqs.iter().enumerate() {
            let row = Rect::new(list.x + 1.0, list.y + 1.0 + index as f32 * LIST_ROW_HEIGHT, list.w - 2.0, LIST_ROW_HEIGHT);
            if row.bottom() > list.bottom() {
                break;
            }
            if selectable_row(ctx, row, mpq, self.selected == Some(index), index) {
                clicked_row = Some(index);
            }
        }
        if clicked_row.is_some() {
            self.selected = clicked_row;
        }
        if self.auxiliary_mpqs.is_empty() {
            draw_text("None", list.x + 8.0, list.y + 16.0, FONT_SIZE_CONTENT, TEXT_DIM);
        }

        let buttons_y = list.bottom() + 8.0;
        let add = Rect::new(body.x, buttons_y, BUTTON_WIDTH, FIELD_HEIGHT);
        let remove = Rect::new(add.right() + 6.0, buttons_y, BUTTON_WIDTH, FIELD_HEIGHT);
        if text_button(ctx, add, "Add...", HEADER_COLOR) {
            let mut dialog = FileDialog::new().add_filter("MPQ Archive", &["mpq", "MPQ"]);
            if self.auxiliary_root.is_dir() {
                dialog = dialog.set_directory(&self.auxiliary_root);
            }
            if let Some(picked) = dialog.pick_file() {
                self.add_mpq(&picked);
            }
        }
        if text_button_enabled(ctx, remove, "Remove", HEADER_COLOR, self.selected.is_some()) {
            self.remove_selected();
        }

        let name_valid = !self.name.text.trim().is_empty();
        let (save, cancel) = save_cancel_buttons(ctx, layout.footer, name_valid);
        let result = if save { Some(self.properties()) } else { None };
        if save || cancel || layout.close_clicked {
            self.hide();
        }

        ctx.leave_layer();
        result
    }
}

impl Default for ProjectPropertiesDialog {
    fn default() -> Self {
        Self::new()
    }
}
