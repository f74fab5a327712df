//! Editor windows
//!
//! Every open file gets one floating editor window, keyed by the file's
//! unique id. Editors are built from a constructor registered per
//! [`FileType`]; file types without one cannot be opened.
//!
//! Each frame an editor first runs [`EditorWindow::build`] (input and state
//! changes, in open order) and later [`EditorWindow::render`] (drawing, in
//! stacking order).

mod dc6_editor;
mod font_table_editor;
mod manager;
mod palette_editor;
mod text_editor;

pub use dc6_editor::Dc6Editor;
pub use font_table_editor::FontTableEditor;
pub use manager::{EditorManager, OpenOutcome};
pub use palette_editor::PaletteEditor;
pub use text_editor::TextEditor;

use crate::archive::ArchiveError;
use crate::formats::{FileType, FormatError};
use crate::input::{Shortcut, ShortcutAction, ShortcutRegistry, ShortcutScope};
use crate::project::PathEntry;
use crate::texture::TextureLoader;
use crate::ui::{FloatingWindow, Rect, UiContext};
use macroquad::prelude::{KeyCode, Texture2D};
use std::collections::HashMap;
use thiserror::Error;

pub type EditorId = String;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: ArchiveError,
    },
    #[error("no file type is defined for {0}")]
    UnknownFileType(String),
    #[error("no editor is defined for {} files", .0.label())]
    NoEditor(FileType),
    #[error("could not create editor: {0}")]
    Create(#[source] FormatError),
    #[error("could not save {path}: {source}")]
    Save {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl EditorError {
    /// Short message for the error dialog
    pub fn user_message(&self) -> &'static str {
        match self {
            EditorError::Read { .. } => "Could not load file!",
            EditorError::UnknownFileType(_) => "No file type is defined for this extension!",
            EditorError::NoEditor(_) => "No editor is defined for this file type!",
            EditorError::Create(_) => "Error creating editor!",
            EditorError::Save { .. } => "Could not save file!",
        }
    }
}

/// State shared by every editor: the file, its window and the bytes last
/// written to (or read from) disk.
pub struct EditorBase {
    pub path: PathEntry,
    pub window: FloatingWindow,
    id: EditorId,
    saved: Vec<u8>,
}

impl EditorBase {
    pub fn new(path: &PathEntry, data: &[u8], content_w: f32, content_h: f32) -> Self {
        let id = path.unique_id();
        let title = match path.mpq_file.as_deref().and_then(|p| p.file_name()) {
            Some(archive) => format!("{} ({})", path.name, archive.to_string_lossy()),
            None => path.name.clone(),
        };
        Self {
            path: path.clone(),
            window: FloatingWindow::new(&id, title, content_w, content_h),
            id,
            saved: data.to_vec(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn saved_data(&self) -> &[u8] {
        &self.saved
    }

    pub fn write(&mut self, data: Vec<u8>) -> Result<(), EditorError> {
        self.path.write_bytes(&data).map_err(|source| EditorError::Save {
            path: self.path.full_path.clone(),
            source,
        })?;
        log::info!("Saved {}", self.path.full_path);
        self.saved = data;
        Ok(())
    }
}

/// What an editor gets to work with during a frame
pub struct EditorFrame<'a> {
    pub ctx: &'a mut UiContext,
    pub content: Rect,
    pub textures: &'a mut TextureLoader<Texture2D>,
}

pub trait EditorWindow: Send {
    fn base(&self) -> &EditorBase;
    fn base_mut(&mut self) -> &mut EditorBase;

    /// Input handling and state updates. Must not draw.
    fn build(&mut self, frame: &mut EditorFrame<'_>);

    /// Draw the window content
    fn render(&self, frame: &mut EditorFrame<'_>);

    /// Bytes that saving would write
    fn generate_save_data(&self) -> Vec<u8>;

    /// Title of the editor-specific main menu
    fn menu_title(&self) -> &'static str;

    /// Release editor-held resources before the editor is dropped
    fn cleanup(&mut self) {}

    fn id(&self) -> &str {
        self.base().id()
    }

    fn is_visible(&self) -> bool {
        self.base().window.is_visible()
    }

    fn has_focus(&self) -> bool {
        self.base().window.has_focus()
    }

    fn show(&mut self) {
        self.base_mut().window.show();
    }

    fn hide(&mut self) {
        self.base_mut().window.hide();
    }

    fn blur(&mut self) {
        self.base_mut().window.blur();
    }

    fn bring_to_front(&mut self) {
        let window = &mut self.base_mut().window;
        window.show();
        window.request_focus();
    }

    fn has_changes(&self) -> bool {
        self.generate_save_data() != self.base().saved_data()
    }

    fn save(&mut self) -> Result<(), EditorError> {
        let data = self.generate_save_data();
        self.base_mut().write(data)
    }

    fn register_keyboard_shortcuts(&self, shortcuts: &mut ShortcutRegistry) {
        let id = self.id().to_string();
        shortcuts.register(
            Shortcut::ctrl(KeyCode::S),
            ShortcutAction::SaveEditor(id.clone()),
            ShortcutScope::Window,
        );
        shortcuts.register(
            Shortcut::ctrl(KeyCode::W),
            ShortcutAction::CloseEditor(id),
            ShortcutScope::Window,
        );
    }
}

pub type EditorConstructor = fn(&PathEntry, Vec<u8>) -> Result<Box<dyn EditorWindow>, FormatError>;

/// Editors available out of the box
pub fn default_constructors() -> HashMap<FileType, EditorConstructor> {
    let mut constructors: HashMap<FileType, EditorConstructor> = HashMap::new();
    constructors.insert(FileType::Text, TextEditor::create);
    constructors.insert(FileType::Palette, PaletteEditor::create);
    constructors.insert(FileType::Dc6, Dc6Editor::create);
    constructors.insert(FileType::FontTable, FontTableEditor::create);
    constructors
}

/// Read `path`, resolve its type and construct the matching editor
pub fn create_editor(
    constructors: &HashMap<FileType, EditorConstructor>,
    path: &PathEntry,
) -> Result<Box<dyn EditorWindow>, EditorError> {
    let data = path.read_bytes().map_err(|source| EditorError::Read {
        path: path.full_path.clone(),
        source,
    })?;

    let extension = path.extension().unwrap_or_default();
    let file_type = FileType::resolve(&extension, &data)
        .map_err(|_| EditorError::UnknownFileType(path.name.clone()))?;

    let constructor = constructors
        .get(&file_type)
        .ok_or(EditorError::NoEditor(file_type))?;

    constructor(path, data).map_err(EditorError::Create)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::FontTable;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn file(dir: &Path, name: &str, data: &[u8]) -> PathEntry {
        let path = dir.join(name);
        fs::write(&path, data).unwrap();
        PathEntry::project_file(&path)
    }

    #[test]
    fn test_creates_registered_editors() {
        let dir = TempDir::new().unwrap();
        let constructors = default_constructors();

        let text = create_editor(&constructors, &file(dir.path(), "notes.txt", b"hello")).unwrap();
        assert_eq!(text.menu_title(), "Text Viewer");
        assert!(!text.has_changes());

        let font = create_editor(&constructors, &file(dir.path(), "font.tbl", &FontTable::empty_bytes())).unwrap();
        assert_eq!(font.menu_title(), "Font Table Editor");
    }

    #[test]
    fn test_error_messages() {
        let dir = TempDir::new().unwrap();
        let constructors = default_constructors();

        let unknown = create_editor(&constructors, &file(dir.path(), "a.xyz", b"")).err().unwrap();
        assert_eq!(unknown.user_message(), "No file type is defined for this extension!");

        let strings = create_editor(&constructors, &file(dir.path(), "string.tbl", b"\x00\x01")).err().unwrap();
        assert_eq!(strings.user_message(), "No editor is defined for this file type!");

        let broken = create_editor(&constructors, &file(dir.path(), "bad.dat", b"short")).err().unwrap();
        assert_eq!(broken.user_message(), "Error creating editor!");

        let missing = PathEntry::project_file(&dir.path().join("gone.txt"));
        let missing = create_editor(&constructors, &missing).err().unwrap();
        assert_eq!(missing.user_message(), "Could not load file!");
    }

    #[test]
    fn test_save_writes_and_updates_snapshot() {
        let dir = TempDir::new().unwrap();
        let entry = file(dir.path(), "notes.txt", b"hello");
        let mut base = EditorBase::new(&entry, b"hello", 10.0, 10.0);
        base.write(b"changed".to_vec()).unwrap();
        assert_eq!(base.saved_data(), b"changed");
        assert_eq!(fs::read(&entry.full_path).unwrap(), b"changed");
    }

    #[test]
    fn test_title_names_archive() {
        let entry = PathEntry::mpq_file(Path::new("/d2/d2data.mpq"), "data\\global\\ui\\font.tbl");
        let base = EditorBase::new(&entry, b"", 10.0, 10.0);
        assert_eq!(base.window.title, "font.tbl (d2data.mpq)");
    }
}
