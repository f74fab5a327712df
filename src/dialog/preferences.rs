use super::{draw_modal_frame, labeled_field, save_cancel_buttons, BUTTON_WIDTH, FIELD_HEIGHT};
use crate::config::Config;
use crate::ui::theme::*;
use crate::ui::{checkbox, draw_text_input, text_button, Rect, TextInputState, UiContext};
use rfd::FileDialog;
use std::path::PathBuf;

/// Editor for the environment settings. Works on a copy of the config
/// and hands it back on save.
pub struct PreferencesDialog {
    visible: bool,
    config: Config,
    auxiliary_path: TextInputState,
}

impl PreferencesDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            config: Config::default(),
            auxiliary_path: TextInputState::default(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self, config: &Config) {
        self.config = config.clone();
        self.auxiliary_path = TextInputState::new(config.auxiliary_mpq_path.to_string_lossy());
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.auxiliary_path.focused = false;
    }

    /// The settings as currently entered
    pub fn edited(&self) -> Config {
        let mut config = self.config.clone();
        config.auxiliary_mpq_path = PathBuf::from(self.auxiliary_path.text.trim());
        config
    }

    /// Returns the new settings when the user saves
    pub fn draw(&mut self, ctx: &mut UiContext) -> Option<Config> {
        if !self.visible {
            return None;
        }

        let layout = draw_modal_frame(ctx, "Preferences", 520.0, 220.0);
        let body = layout.body;
        let mut y = body.y;

        let field = labeled_field(body, &mut y, "Auxiliary MPQ Path");
        let (input, browse) = field.split_right(BUTTON_WIDTH);
        draw_text_input(ctx, Rect::new(input.x, input.y, input.w - 6.0, input.h), &mut self.auxiliary_path);
        if text_button(ctx, browse, "Browse...", HEADER_COLOR) {
            let mut dialog = FileDialog::new();
            if self.edited().auxiliary_mpq_path.is_dir() {
                dialog = dialog.set_directory(self.edited().auxiliary_mpq_path);
            }
            if let Some(folder) = dialog.pick_folder() {
                self.auxiliary_path.set_text(folder.to_string_lossy());
            }
        }

        let toggle = Rect::new(body.x, y, body.w, FIELD_HEIGHT);
        checkbox(
            ctx,
            toggle,
            "Open most recent project on startup",
            &mut self.config.open_most_recent_on_startup,
        );

        let (save, cancel) = save_cancel_buttons(ctx, layout.footer, true);
        let result = if save { Some(self.edited()) } else { None };
        if save || cancel || layout.close_clicked {
            self.hide();
        }

        ctx.leave_layer();
        result
    }
}

impl Default for PreferencesDialog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_edits_apply_to_a_copy() {
        let mut config = Config::default();
        config.auxiliary_mpq_path = PathBuf::from("/games/d2");
        config.recent_projects = vec![PathBuf::from("/mods/a.hsp")];
        let mut dialog = PreferencesDialog::new();
        dialog.show(&config);
        assert!(dialog.is_visible());

        dialog.auxiliary_path.set_text("  /games/diablo2 ");
        dialog.config.open_most_recent_on_startup = true;

        let edited = dialog.edited();
        assert_eq!(edited.auxiliary_mpq_path, Path::new("/games/diablo2"));
        assert!(edited.open_most_recent_on_startup);
        assert_eq!(edited.recent_projects, config.recent_projects);
        assert!(!config.open_most_recent_on_startup);
    }
}
