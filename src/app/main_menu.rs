use super::{App, AppAction};
use crate::input::ShortcutAction;
use crate::ui::{draw_menu_bar, Menu, MenuItem, Rect};

type Item = MenuItem<AppAction>;

impl App {
    fn shortcut(&self, action: &ShortcutAction) -> Option<String> {
        self.shortcuts.label_for(action)
    }

    fn file_menu(&self) -> Menu<AppAction> {
        let recent: Vec<Item> = self
            .config()
            .recent_projects
            .iter()
            .map(|path| Item::action(path.display().to_string(), AppAction::OpenRecent(path.clone())))
            .collect();
        let open_recent = if recent.is_empty() {
            Item::action("Open Recent", AppAction::OpenProject).enabled(false)
        } else {
            Item::submenu("Open Recent", recent)
        };

        Menu::new(
            "File",
            vec![
                Item::action("New Project...", AppAction::NewProject)
                    .with_shortcut(self.shortcut(&ShortcutAction::NewProject)),
                Item::action("Open Project...", AppAction::OpenProject)
                    .with_shortcut(self.shortcut(&ShortcutAction::OpenProject)),
                open_recent,
                Item::Separator,
                Item::action("Preferences...", AppAction::ShowPreferences)
                    .with_shortcut(self.shortcut(&ShortcutAction::Preferences)),
                Item::Separator,
                Item::action("Quit", AppAction::Quit).with_shortcut(self.shortcut(&ShortcutAction::Quit)),
            ],
        )
    }

    fn view_menu(&self) -> Menu<AppAction> {
        Menu::new(
            "View",
            vec![
                Item::action("Project Explorer", AppAction::ToggleProjectExplorer)
                    .with_shortcut(self.shortcut(&ShortcutAction::ToggleProjectExplorer))
                    .checked(self.project_explorer.is_visible()),
                Item::action("MPQ Explorer", AppAction::ToggleMpqExplorer)
                    .with_shortcut(self.shortcut(&ShortcutAction::ToggleMpqExplorer))
                    .checked(self.mpq_explorer.is_visible()),
            ],
        )
    }

    /// Menu named after the focused editor, if any
    fn editor_menu(&self) -> Option<Menu<AppAction>> {
        let id = self.editors.focused()?;
        let set = self.editors.lock();
        let editor = set.get(&id)?;
        let writable = editor.base().path.is_writable();
        Some(Menu::new(
            editor.menu_title(),
            vec![
                Item::action("Save", AppAction::SaveEditor(id.clone()))
                    .with_shortcut(self.shortcut(&ShortcutAction::SaveEditor(id.clone())))
                    .enabled(writable),
                Item::action("Close", AppAction::CloseActiveEditor)
                    .with_shortcut(self.shortcut(&ShortcutAction::CloseEditor(id))),
            ],
        ))
    }

    pub(super) fn build_menus(&self) -> Vec<Menu<AppAction>> {
        let mut menus = vec![self.file_menu(), self.view_menu()];
        menus.push(Menu::new(
            "Project",
            vec![Item::action("Properties...", AppAction::ShowProjectProperties).enabled(self.project().is_some())],
        ));
        if let Some(menu) = self.editor_menu() {
            menus.push(menu);
        }
        menus.push(Menu::new(
            "Help",
            vec![Item::action("About HellSpawner...", AppAction::ShowAbout)
                .with_shortcut(self.shortcut(&ShortcutAction::About))],
        ));
        menus
    }

    pub(super) fn draw_main_menu(&mut self, rect: Rect) {
        let menus = self.build_menus();
        if let Some(action) = draw_menu_bar(&mut self.ctx, &mut self.menu, rect, &menus, &self.window_title) {
            self.pending.push(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::notify::test_support::RecordingNotifier;
    use crate::project::PathEntry;
    use crate::ui::MouseState;
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn app(config: Config) -> App {
        App::new(config, Box::new(Rc::new(RecordingNotifier::default())))
    }

    fn titles(menus: &[Menu<AppAction>]) -> Vec<String> {
        menus.iter().map(|m| m.title.clone()).collect()
    }

    fn labels(items: &[Item]) -> Vec<String> {
        items
            .iter()
            .filter_map(|item| match item {
                MenuItem::Action { label, .. } | MenuItem::Submenu { label, .. } => Some(label.clone()),
                MenuItem::Separator => None,
            })
            .collect()
    }

    #[test]
    fn test_default_menus() {
        let app = app(Config::default());
        let menus = app.build_menus();
        assert_eq!(titles(&menus), vec!["File", "View", "Project", "Help"]);

        let Some(MenuItem::Action { enabled, .. }) = menus[2].items.first() else {
            panic!("expected properties action");
        };
        assert!(!enabled);

        let recent = menus[0].items.iter().find_map(|item| match item {
            MenuItem::Action { label, enabled, .. } if label.as_str() == "Open Recent" => Some(*enabled),
            _ => None,
        });
        assert_eq!(recent, Some(false));
    }

    #[test]
    fn test_recent_projects_submenu() {
        let mut config = Config::default();
        config.recent_projects = vec![PathBuf::from("/mods/a.hsp"), PathBuf::from("/mods/b.hsp")];
        let menus = app(config).build_menus();
        let submenu = menus[0].items.iter().find_map(|item| match item {
            MenuItem::Submenu { label, items } if label.as_str() == "Open Recent" => Some(items),
            _ => None,
        });
        let items = submenu.expect("recent submenu");
        assert_eq!(labels(items), vec!["/mods/a.hsp", "/mods/b.hsp"]);
    }

    #[test]
    fn test_focused_editor_adds_menu() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("act1.dat");
        fs::write(&path, vec![0u8; 768]).unwrap();

        let mut app = app(Config::default());
        app.open_file(&PathEntry::project_file(&path));
        app.ctx.begin_frame(MouseState::default());
        app.build_editors(Rect::new(0.0, 0.0, 1280.0, 720.0));

        let menus = app.build_menus();
        assert_eq!(titles(&menus), vec!["File", "View", "Project", "Palette Editor", "Help"]);
        let items = &menus[3].items;
        assert_eq!(labels(items), vec!["Save", "Close"]);
        let Some(MenuItem::Action { shortcut, .. }) = items.first() else {
            panic!("expected save action");
        };
        assert_eq!(shortcut.as_deref(), Some("Ctrl+S"));
    }
}
