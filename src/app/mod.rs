//! Application shell
//!
//! Owns the project, the environment config, open editors, the docked
//! explorers and the modal dialogs. Anything that changes shell state while
//! a frame is being drawn is queued as an [`AppAction`] and applied once
//! drawing is done, so the editor lock is never taken re-entrantly.

mod main_menu;

use crate::config::Config;
use crate::dialog::{AboutDialog, PreferencesDialog, ProjectPropertiesDialog};
use crate::editor::{create_editor, default_constructors, EditorConstructor, EditorFrame, EditorId, EditorManager, OpenOutcome};
use crate::explorer::{MpqExplorer, ProjectExplorer, TreeAction};
use crate::formats::{FileType, FontTable};
use crate::input::{ShortcutAction, ShortcutRegistry};
use crate::notify::Notifier;
use crate::project::{PathEntry, Project, ProjectProperties, PROJECT_EXTENSION};
use crate::texture::{self, TextureLoader};
use crate::ui::theme::BG_COLOR;
use crate::ui::{MenuBarState, MouseState, Rect, UiContext, MENU_BAR_HEIGHT};
use macroquad::prelude::{clear_background, screen_height, screen_width, Texture2D};
use rfd::FileDialog;
use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "HellSpawner";
const EXPLORER_WIDTH: f32 = 280.0;
const LOAD_ERROR_TITLE: &str = "Load HellSpawner Project Error";
const CASCADE_STEP: f32 = 24.0;
const CASCADE_SLOTS: usize = 8;

/// Deferred shell operations
#[derive(Debug, Clone)]
pub enum AppAction {
    NewProject,
    OpenProject,
    OpenRecent(PathBuf),
    OpenFile(PathEntry),
    NewFontTable(PathBuf),
    ShowPreferences,
    ShowAbout,
    ShowProjectProperties,
    ToggleProjectExplorer,
    ToggleMpqExplorer,
    SaveEditor(EditorId),
    CloseEditor(EditorId),
    CloseActiveEditor,
    ClosePopups,
    PreferencesChanged(Config),
    ProjectPropertiesChanged(ProjectProperties),
    Quit,
}

impl From<ShortcutAction> for AppAction {
    fn from(action: ShortcutAction) -> Self {
        match action {
            ShortcutAction::NewProject => AppAction::NewProject,
            ShortcutAction::OpenProject => AppAction::OpenProject,
            ShortcutAction::Preferences => AppAction::ShowPreferences,
            ShortcutAction::ToggleProjectExplorer => AppAction::ToggleProjectExplorer,
            ShortcutAction::ToggleMpqExplorer => AppAction::ToggleMpqExplorer,
            ShortcutAction::About => AppAction::ShowAbout,
            ShortcutAction::ClosePopups => AppAction::ClosePopups,
            ShortcutAction::Quit => AppAction::Quit,
            ShortcutAction::SaveEditor(id) => AppAction::SaveEditor(id),
            ShortcutAction::CloseEditor(id) => AppAction::CloseEditor(id),
        }
    }
}

impl From<TreeAction> for AppAction {
    fn from(action: TreeAction) -> Self {
        match action {
            TreeAction::Open(entry) => AppAction::OpenFile(entry),
            TreeAction::NewFontTable(dir) => AppAction::NewFontTable(dir),
        }
    }
}

/// Log and terminate. Used when project or config state can no longer be
/// persisted.
fn fatal(context: &str, error: impl Display) -> ! {
    log::error!("{context}: {error}");
    std::process::exit(1);
}

/// `<dir>/<stem>.<ext>`, or the first `<stem>_<n>.<ext>` that does not exist
fn unique_file_name(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let mut path = dir.join(format!("{stem}.{extension}"));
    let mut counter = 1;
    while path.exists() {
        path = dir.join(format!("{stem}_{counter}.{extension}"));
        counter += 1;
    }
    path
}

pub struct App {
    project: Option<Project>,
    config: Config,
    editors: EditorManager,
    constructors: HashMap<FileType, EditorConstructor>,
    notifier: Box<dyn Notifier>,
    shortcuts: ShortcutRegistry,
    textures: TextureLoader<Texture2D>,
    ctx: UiContext,
    menu: MenuBarState,
    /// Editor ids bottom to top
    window_order: Vec<EditorId>,
    project_explorer: ProjectExplorer,
    mpq_explorer: MpqExplorer,
    about: AboutDialog,
    preferences: PreferencesDialog,
    project_properties: ProjectPropertiesDialog,
    pending: Vec<AppAction>,
    window_title: String,
    opened_windows: usize,
    quit: bool,
}

impl App {
    pub fn new(config: Config, notifier: Box<dyn Notifier>) -> Self {
        Self {
            project: None,
            config,
            editors: EditorManager::new(),
            constructors: default_constructors(),
            notifier,
            shortcuts: ShortcutRegistry::with_global_defaults(),
            textures: TextureLoader::new(),
            ctx: UiContext::new(),
            menu: MenuBarState::default(),
            window_order: Vec::new(),
            project_explorer: ProjectExplorer::new(),
            mpq_explorer: MpqExplorer::new(),
            about: AboutDialog::new(),
            preferences: PreferencesDialog::new(),
            project_properties: ProjectPropertiesDialog::new(),
            pending: Vec::new(),
            window_title: APP_NAME.to_string(),
            opened_windows: 0,
            quit: false,
        }
    }

    /// Reopen the most recent project when the config asks for it
    pub fn startup(&mut self) {
        if !self.config.open_most_recent_on_startup {
            return;
        }
        if let Some(path) = self.config.most_recent_project().map(Path::to_path_buf) {
            log::info!("Opening most recent project {}", path.display());
            self.load_project_from_file(&path);
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn window_title(&self) -> &str {
        &self.window_title
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one frame: draw everything, then apply what the frame asked for
    pub fn frame(&mut self) {
        self.ctx.begin_frame(MouseState::capture());
        self.textures.poll(texture::upload);
        clear_background(BG_COLOR);

        let screen = Rect::screen(screen_width(), screen_height());
        let workspace = screen.remaining_after_top(MENU_BAR_HEIGHT);

        self.prune_editors();
        self.build_editors(workspace);
        self.draw_editors();
        self.draw_explorers(workspace);
        self.draw_main_menu(screen.slice_top(MENU_BAR_HEIGHT));
        self.draw_dialogs();
        self.ctx.draw_tooltip();

        let modal = self.dialog_open();
        let triggered = self.shortcuts.poll(self.ctx.text_editing());
        self.pending.extend(
            triggered
                .into_iter()
                .filter(|action| !modal || *action == ShortcutAction::ClosePopups)
                .map(AppAction::from),
        );
        self.process_actions();
    }

    fn prune_editors(&mut self) {
        for id in self.editors.prune() {
            self.textures.evict_owner(&id);
            self.window_order.retain(|open| open != &id);
            log::debug!("Closed editor {id}");
        }
    }

    /// Input pass over every editor in open order
    fn build_editors(&mut self, workspace: Rect) {
        let ctx = &mut self.ctx;
        let textures = &mut self.textures;
        let pending = &mut self.pending;
        let mut raised = Vec::new();

        self.editors.render_pass(&mut self.shortcuts, |editor| {
            let id = editor.id().to_string();
            ctx.enter_layer(&editor.base().window.layer().to_string());
            let response = editor.base_mut().window.update(ctx, workspace);
            let mut frame = EditorFrame { ctx: &mut *ctx, content: response.content, textures: &mut *textures };
            editor.build(&mut frame);
            ctx.leave_layer();

            if editor.base_mut().window.take_raised() {
                raised.push(id.clone());
            }
            if response.close_clicked {
                pending.push(AppAction::CloseEditor(id));
            }
        });

        for id in raised {
            self.raise(&id);
        }
    }

    /// Draw editors bottom to top
    fn draw_editors(&mut self) {
        let set = self.editors.lock();
        for id in &self.window_order {
            let Some(editor) = set.get(id) else {
                continue;
            };
            if !editor.is_visible() {
                continue;
            }
            let window = &editor.base().window;
            window.draw(&mut self.ctx);
            self.ctx.enter_layer(window.layer());
            let mut frame = EditorFrame {
                ctx: &mut self.ctx,
                content: window.content_rect(),
                textures: &mut self.textures,
            };
            editor.render(&mut frame);
            self.ctx.leave_layer();
        }
    }

    fn draw_explorers(&mut self, workspace: Rect) {
        let (left, rest) = workspace.split_left(EXPLORER_WIDTH);
        let (_, right) = rest.split_right(EXPLORER_WIDTH);
        let mut tree_actions = Vec::new();
        self.project_explorer.draw(&mut self.ctx, left, self.project.as_mut(), &mut tree_actions);
        self.mpq_explorer.draw(&mut self.ctx, right, self.project.as_ref(), &mut tree_actions);
        self.pending.extend(tree_actions.into_iter().map(AppAction::from));
    }

    fn draw_dialogs(&mut self) {
        self.about.draw(&mut self.ctx);
        if let Some(config) = self.preferences.draw(&mut self.ctx) {
            self.pending.push(AppAction::PreferencesChanged(config));
        }
        if let Some(properties) = self.project_properties.draw(&mut self.ctx) {
            self.pending.push(AppAction::ProjectPropertiesChanged(properties));
        }
    }

    /// A modal dialog swallows every shortcut except Escape
    fn dialog_open(&self) -> bool {
        self.about.is_visible() || self.preferences.is_visible() || self.project_properties.is_visible()
    }

    fn raise(&mut self, id: &str) {
        if let Some(index) = self.window_order.iter().position(|open| open == id) {
            let id = self.window_order.remove(index);
            self.window_order.push(id);
        }
    }

    fn process_actions(&mut self) {
        for action in std::mem::take(&mut self.pending) {
            self.apply(action);
        }
    }

    pub fn apply(&mut self, action: AppAction) {
        match action {
            AppAction::NewProject => self.new_project(),
            AppAction::OpenProject => self.open_project(),
            AppAction::OpenRecent(path) => {
                self.load_project_from_file(&path);
            }
            AppAction::OpenFile(entry) => self.open_file(&entry),
            AppAction::NewFontTable(dir) => {
                self.create_font_table(&dir);
            }
            AppAction::ShowPreferences => {
                self.close_popups();
                self.preferences.show(&self.config);
            }
            AppAction::ShowAbout => {
                self.close_popups();
                self.about.show();
            }
            AppAction::ShowProjectProperties => {
                self.close_popups();
                if let Some(project) = &self.project {
                    self.project_properties.show(project, &self.config);
                }
            }
            AppAction::ToggleProjectExplorer => self.project_explorer.toggle(),
            AppAction::ToggleMpqExplorer => self.mpq_explorer.toggle(),
            AppAction::SaveEditor(id) => self.save_editor(&id),
            AppAction::CloseEditor(id) => {
                self.editors.request_close(&id, self.notifier.as_ref());
            }
            AppAction::CloseActiveEditor => self.close_active_editor(),
            AppAction::ClosePopups => self.close_popups(),
            AppAction::PreferencesChanged(config) => self.on_preferences_changed(config),
            AppAction::ProjectPropertiesChanged(properties) => self.on_project_properties_changed(properties),
            AppAction::Quit => self.quit(),
        }
    }

    /// Open an editor for `entry`, or focus the one already open
    pub fn open_file(&mut self, entry: &PathEntry) {
        let id = entry.unique_id();
        let constructors = &self.constructors;
        match self.editors.open_with(&id, || create_editor(constructors, entry)) {
            Ok(OpenOutcome::Created) => {
                let slot = (self.opened_windows % CASCADE_SLOTS) as f32;
                self.opened_windows += 1;
                self.editors.with_editor(&id, |editor| {
                    editor.base_mut().window.move_to(
                        EXPLORER_WIDTH + 20.0 + slot * CASCADE_STEP,
                        MENU_BAR_HEIGHT + 20.0 + slot * CASCADE_STEP,
                    );
                });
                self.window_order.push(id);
            }
            Ok(OpenOutcome::Existing) => self.raise(&id),
            Err(e) => {
                log::error!("Could not open {}: {}", entry.full_path, e);
                self.notifier.error("Error", e.user_message());
            }
        }
    }

    fn save_editor(&mut self, id: &str) {
        if let Some(Err(e)) = self.editors.save(id) {
            log::error!("{e}");
            self.notifier.error("Save Error", e.user_message());
        }
    }

    pub fn close_active_editor(&mut self) {
        if let Some(id) = self.editors.focused() {
            self.editors.request_close(&id, self.notifier.as_ref());
        }
    }

    pub fn close_popups(&mut self) {
        self.about.hide();
        self.preferences.hide();
        self.project_properties.hide();
        self.project_explorer.close_popups();
        self.mpq_explorer.close_popups();
        self.menu.close();
    }

    pub fn quit(&mut self) {
        log::info!("Quitting");
        self.quit = true;
    }

    pub fn update_window_title(&mut self) {
        self.window_title = match &self.project {
            Some(project) => format!("{APP_NAME} - {}", project.project_name),
            None => APP_NAME.to_string(),
        };
    }

    /// Replace the current project with the one at `path`. On failure the
    /// current project is kept and the user is told why.
    pub fn load_project_from_file(&mut self, path: &Path) -> bool {
        let mut project = match Project::load_from_file(path) {
            Ok(project) => project,
            Err(e) => {
                log::error!("Could not load project {}: {}", path.display(), e);
                self.notifier.error(LOAD_ERROR_TITLE, "Could not load project.");
                return false;
            }
        };

        if !project.validate_auxiliary_mpqs(&self.config) {
            self.notifier.error(
                LOAD_ERROR_TITLE,
                "Could not load project.\nCould not locate one or more auxiliary MPQs!",
            );
            return false;
        }

        if let Err(e) = self.config.add_to_recent_projects(path) {
            fatal("Could not save config", e);
        }

        project.reload_auxiliary_mpqs(&self.config);
        log::info!("Loaded project {} from {}", project.project_name, path.display());
        self.project = Some(project);
        self.update_window_title();
        self.mpq_explorer.reset();
        self.project_explorer.reset();
        self.project_explorer.show();
        true
    }

    pub fn new_project(&mut self) {
        if let Some(folder) = FileDialog::new().set_title("Select Project Folder").pick_folder() {
            self.create_project_in(&folder);
        }
    }

    /// Create a project named after `folder` inside it and load it
    pub fn create_project_in(&mut self, folder: &Path) -> bool {
        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        match Project::create(folder, &name) {
            Ok(project) => {
                let path = project.file_path().to_path_buf();
                self.load_project_from_file(&path)
            }
            Err(e) => {
                log::error!("Could not create project in {}: {}", folder.display(), e);
                self.notifier.error("New Project Error", "Could not create project.");
                false
            }
        }
    }

    pub fn open_project(&mut self) {
        let picked = FileDialog::new()
            .set_title("Open HellSpawner Project")
            .add_filter("HellSpawner Project", &[PROJECT_EXTENSION])
            .pick_file();
        if let Some(path) = picked {
            self.load_project_from_file(&path);
        }
    }

    pub fn on_project_properties_changed(&mut self, properties: ProjectProperties) {
        let Some(project) = self.project.as_mut() else {
            return;
        };
        project.apply_properties(properties);
        if let Err(e) = project.save() {
            fatal("Could not save project", e);
        }
        project.reload_auxiliary_mpqs(&self.config);
        self.mpq_explorer.reset();
        self.update_window_title();
    }

    pub fn on_preferences_changed(&mut self, config: Config) {
        self.config.apply(config);
        if let Err(e) = self.config.save() {
            fatal("Could not save config", e);
        }
        if let Some(project) = self.project.as_mut() {
            project.reload_auxiliary_mpqs(&self.config);
            self.mpq_explorer.reset();
        }
    }

    /// Write an empty font table into `dir` under a free name
    pub fn create_font_table(&mut self, dir: &Path) -> Option<PathBuf> {
        let path = unique_file_name(dir, "new_font", "tbl");
        match fs::write(&path, FontTable::empty_bytes()) {
            Ok(()) => {
                log::info!("Created {}", path.display());
                if let Some(project) = self.project.as_mut() {
                    project.invalidate_file_structure();
                }
                Some(path)
            }
            Err(e) => {
                log::error!("Could not create {}: {}", path.display(), e);
                self.notifier.error("Error", "Could not create font table.");
                None
            }
        }
    }
}
