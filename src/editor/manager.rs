//! Open editor bookkeeping: one editor per file, focus handover and
//! closing with unsaved-change prompts.

use super::{EditorError, EditorId, EditorWindow};
use crate::input::ShortcutRegistry;
use crate::notify::Notifier;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Created,
    /// The file already had an editor; it was shown and focused
    Existing,
}

/// Open editors in the order they were opened
#[derive(Default)]
pub struct EditorSet {
    editors: Vec<Box<dyn EditorWindow>>,
    focused: Option<EditorId>,
}

impl EditorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&dyn EditorWindow> {
        self.editors.iter().find(|e| e.id() == id).map(|e| e.as_ref())
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Box<dyn EditorWindow>> {
        self.editors.iter_mut().find(|e| e.id() == id)
    }

    /// Focus the editor for `id` if one is open, otherwise add the one
    /// `create` builds.
    pub fn open_with<F>(&mut self, id: &str, create: F) -> Result<OpenOutcome, EditorError>
    where
        F: FnOnce() -> Result<Box<dyn EditorWindow>, EditorError>,
    {
        if let Some(editor) = self.get_mut(id) {
            editor.bring_to_front();
            return Ok(OpenOutcome::Existing);
        }

        let mut editor = create()?;
        editor.bring_to_front();
        log::info!("Opened editor for {}", editor.id());
        self.editors.push(editor);
        Ok(OpenOutcome::Created)
    }

    /// Drop hidden editors, returning their ids
    pub fn prune(&mut self) -> Vec<EditorId> {
        let mut removed = Vec::new();
        self.editors.retain_mut(|editor| {
            if editor.is_visible() {
                return true;
            }
            editor.cleanup();
            removed.push(editor.id().to_string());
            false
        });

        if self.focused.as_ref().is_some_and(|id| removed.contains(id)) {
            self.focused = None;
        }
        removed
    }

    /// Run `build` for every visible editor in open order. An editor that
    /// gains focus takes over the window-scoped shortcuts and the others
    /// are blurred.
    pub fn render_pass<F>(&mut self, shortcuts: &mut ShortcutRegistry, mut build: F)
    where
        F: FnMut(&mut dyn EditorWindow),
    {
        let mut newly_focused = None;
        for (index, editor) in self.editors.iter_mut().enumerate() {
            if !editor.is_visible() {
                continue;
            }
            let had_focus = editor.has_focus();
            build(editor.as_mut());
            if !had_focus && editor.has_focus() {
                shortcuts.unregister_window_shortcuts();
                editor.register_keyboard_shortcuts(shortcuts);
                self.focused = Some(editor.id().to_string());
                newly_focused = Some(index);
            }
        }

        if let Some(focused_index) = newly_focused {
            for (index, editor) in self.editors.iter_mut().enumerate() {
                if index != focused_index {
                    editor.blur();
                }
            }
        }

        let still_focused = self.focused.as_deref().is_some_and(|id| {
            self.editors.iter().any(|e| e.id() == id && e.has_focus())
        });
        if self.focused.is_some() && !still_focused {
            shortcuts.unregister_window_shortcuts();
            self.focused = None;
        }
    }

    pub fn with_editor<R>(&mut self, id: &str, f: impl FnOnce(&mut dyn EditorWindow) -> R) -> Option<R> {
        self.get_mut(id).map(|editor| f(editor.as_mut()))
    }

    /// Ask before discarding changes, then hide the editor. It is dropped
    /// on the next prune.
    pub fn request_close(&mut self, id: &str, notifier: &dyn Notifier) -> bool {
        match self.get_mut(id) {
            Some(editor) => {
                close_editor(editor.as_mut(), notifier);
                true
            }
            None => false,
        }
    }

    pub fn save(&mut self, id: &str) -> Option<Result<(), EditorError>> {
        self.with_editor(id, |editor| editor.save())
    }
}

/// Close `editor`, offering to save unsaved changes first
fn close_editor(editor: &mut dyn EditorWindow, notifier: &dyn Notifier) {
    if editor.has_changes() {
        let message = format!(
            "There are unsaved changes to {}, save before closing this editor?",
            editor.base().path.full_path
        );
        if notifier.confirm("Confirm", &message) {
            if let Err(e) = editor.save() {
                log::error!("{e}");
                notifier.error("Save Error", e.user_message());
            }
        }
    }
    editor.hide();
}

/// The open editors behind a lock
#[derive(Default)]
pub struct EditorManager {
    inner: Mutex<EditorSet>,
}

impl EditorManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, EditorSet> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn open_with<F>(&self, id: &str, create: F) -> Result<OpenOutcome, EditorError>
    where
        F: FnOnce() -> Result<Box<dyn EditorWindow>, EditorError>,
    {
        self.lock().open_with(id, create)
    }

    pub fn prune(&self) -> Vec<EditorId> {
        self.lock().prune()
    }

    pub fn render_pass<F>(&self, shortcuts: &mut ShortcutRegistry, build: F)
    where
        F: FnMut(&mut dyn EditorWindow),
    {
        self.lock().render_pass(shortcuts, build)
    }

    pub fn with_editor<R>(&self, id: &str, f: impl FnOnce(&mut dyn EditorWindow) -> R) -> Option<R> {
        self.lock().with_editor(id, f)
    }

    pub fn request_close(&self, id: &str, notifier: &dyn Notifier) -> bool {
        self.lock().request_close(id, notifier)
    }

    pub fn save(&self, id: &str) -> Option<Result<(), EditorError>> {
        self.lock().save(id)
    }

    pub fn focused(&self) -> Option<EditorId> {
        self.lock().focused().map(str::to_string)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditorBase, EditorFrame};
    use crate::input::ShortcutAction;
    use crate::notify::test_support::RecordingNotifier;
    use crate::project::PathEntry;
    use crate::ui::{MouseState, Rect, UiContext};
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct MockEditor {
        base: EditorBase,
        data: Vec<u8>,
        cleaned: Arc<AtomicBool>,
    }

    impl MockEditor {
        fn boxed(dir: &Path, name: &str) -> Box<dyn EditorWindow> {
            Box::new(Self::new(dir, name, Arc::new(AtomicBool::new(false))))
        }

        fn new(dir: &Path, name: &str, cleaned: Arc<AtomicBool>) -> Self {
            let path = dir.join(name);
            fs::write(&path, b"original").unwrap();
            let entry = PathEntry::project_file(&path);
            Self {
                base: EditorBase::new(&entry, b"original", 100.0, 100.0),
                data: b"original".to_vec(),
                cleaned,
            }
        }
    }

    impl EditorWindow for MockEditor {
        fn base(&self) -> &EditorBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut EditorBase {
            &mut self.base
        }

        fn build(&mut self, _frame: &mut EditorFrame<'_>) {}

        fn render(&self, _frame: &mut EditorFrame<'_>) {}

        fn generate_save_data(&self) -> Vec<u8> {
            self.data.clone()
        }

        fn menu_title(&self) -> &'static str {
            "Mock"
        }

        fn cleanup(&mut self) {
            self.cleaned.store(true, Ordering::SeqCst);
        }
    }

    fn id_for(dir: &Path, name: &str) -> String {
        PathEntry::project_file(&dir.join(name)).unique_id()
    }

    /// Apply pending focus requests the way a window update would
    fn focus_pass(set: &mut EditorSet, shortcuts: &mut ShortcutRegistry) {
        let mut ctx = UiContext::new();
        ctx.begin_frame(MouseState::default());
        set.render_pass(shortcuts, |editor| {
            let window = &mut editor.base_mut().window;
            ctx.enter_layer(&window.layer().to_string());
            window.update(&mut ctx, Rect::new(0.0, 0.0, 1000.0, 800.0));
            ctx.leave_layer();
        });
    }

    fn save_targets(shortcuts: &ShortcutRegistry) -> Vec<String> {
        shortcuts
            .window_shortcuts()
            .iter()
            .filter_map(|(_, action)| match action {
                ShortcutAction::SaveEditor(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_open_same_file_twice_keeps_one_editor() {
        let dir = TempDir::new().unwrap();
        let manager = EditorManager::new();
        let id = id_for(dir.path(), "a.txt");

        let first = manager.open_with(&id, || Ok(MockEditor::boxed(dir.path(), "a.txt")));
        assert_eq!(first.unwrap(), OpenOutcome::Created);

        let second = manager.open_with(&id, || panic!("editor must not be rebuilt"));
        assert_eq!(second.unwrap(), OpenOutcome::Existing);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_focus_moves_window_shortcuts() {
        let dir = TempDir::new().unwrap();
        let mut set = EditorSet::new();
        let mut shortcuts = ShortcutRegistry::with_global_defaults();
        let a = id_for(dir.path(), "a.txt");
        let b = id_for(dir.path(), "b.txt");

        set.open_with(&a, || Ok(MockEditor::boxed(dir.path(), "a.txt"))).unwrap();
        focus_pass(&mut set, &mut shortcuts);
        assert_eq!(set.focused(), Some(a.as_str()));
        assert_eq!(save_targets(&shortcuts), vec![a.clone()]);

        set.open_with(&b, || Ok(MockEditor::boxed(dir.path(), "b.txt"))).unwrap();
        focus_pass(&mut set, &mut shortcuts);
        assert_eq!(set.focused(), Some(b.as_str()));
        assert_eq!(save_targets(&shortcuts), vec![b.clone()]);
        assert!(!set.get(&a).unwrap().has_focus());
    }

    #[test]
    fn test_prune_drops_hidden_editors() {
        let dir = TempDir::new().unwrap();
        let mut set = EditorSet::new();
        let mut shortcuts = ShortcutRegistry::new();
        let cleaned = Arc::new(AtomicBool::new(false));
        let id = id_for(dir.path(), "a.txt");

        let editor = MockEditor::new(dir.path(), "a.txt", cleaned.clone());
        set.open_with(&id, || Ok(Box::new(editor))).unwrap();
        focus_pass(&mut set, &mut shortcuts);
        assert!(set.prune().is_empty());

        set.with_editor(&id, |editor| editor.hide());
        assert_eq!(set.prune(), vec![id]);
        assert!(set.is_empty());
        assert!(set.focused().is_none());
        assert!(cleaned.load(Ordering::SeqCst));
    }

    #[test]
    fn test_close_with_changes_saves_on_confirm() {
        let dir = TempDir::new().unwrap();
        let mut set = EditorSet::new();
        let id = id_for(dir.path(), "a.txt");
        set.open_with(&id, || {
            let mut editor = MockEditor::new(dir.path(), "a.txt", Arc::new(AtomicBool::new(false)));
            editor.data = b"edited".to_vec();
            Ok(Box::new(editor))
        })
        .unwrap();

        let notifier = Rc::new(RecordingNotifier::answering(true));
        assert!(set.request_close(&id, &notifier));
        assert_eq!(notifier.questions.borrow().len(), 1);
        assert!(notifier.questions.borrow()[0].starts_with("There are unsaved changes to"));
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"edited");
        assert!(!set.get(&id).unwrap().is_visible());
    }

    #[test]
    fn test_close_with_changes_discards_on_decline() {
        let dir = TempDir::new().unwrap();
        let mut set = EditorSet::new();
        let id = id_for(dir.path(), "a.txt");
        set.open_with(&id, || {
            let mut editor = MockEditor::new(dir.path(), "a.txt", Arc::new(AtomicBool::new(false)));
            editor.data = b"edited".to_vec();
            Ok(Box::new(editor))
        })
        .unwrap();

        let notifier = Rc::new(RecordingNotifier::answering(false));
        set.request_close(&id, &notifier);
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"original");
        assert_eq!(set.prune().len(), 1);
    }

    #[test]
    fn test_close_without_changes_does_not_ask() {
        let dir = TempDir::new().unwrap();
        let mut set = EditorSet::new();
        let id = id_for(dir.path(), "a.txt");
        set.open_with(&id, || Ok(MockEditor::boxed(dir.path(), "a.txt"))).unwrap();

        let notifier = Rc::new(RecordingNotifier::answering(true));
        set.request_close(&id, &notifier);
        assert!(notifier.questions.borrow().is_empty());
        assert!(!set.request_close("missing", &notifier));
    }
}
