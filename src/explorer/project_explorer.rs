use super::{draw_placeholder, draw_tree, TreeAction, TreeState};
use crate::project::Project;
use crate::ui::{dock_panel, Rect, Toolbar, UiContext};

const LAYER: &str = "project-explorer";
const TOOLBAR_HEIGHT: f32 = 24.0;

/// Browser over the project's content folder
pub struct ProjectExplorer {
    visible: bool,
    tree: TreeState,
}

impl ProjectExplorer {
    pub fn new() -> Self {
        Self { visible: false, tree: TreeState::default() }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn close_popups(&mut self) {
        self.tree.close_context_menu();
    }

    /// Forget expansion state, for a newly loaded project
    pub fn reset(&mut self) {
        self.tree = TreeState::default();
    }

    pub fn draw(&mut self, ctx: &mut UiContext, rect: Rect, project: Option<&mut Project>, actions: &mut Vec<TreeAction>) {
        if !self.visible {
            return;
        }

        let (closed, content) = dock_panel(ctx, LAYER, rect, "Project Explorer");
        if closed {
            self.visible = false;
        }

        let mut toolbar = Toolbar::new(content.slice_top(TOOLBAR_HEIGHT));
        let refresh = toolbar.button(ctx, "Refresh", project.is_some());
        let body = content.remaining_after_top(TOOLBAR_HEIGHT + 2.0);

        match project {
            None => draw_placeholder(body, "No project loaded..."),
            Some(project) => {
                if refresh {
                    log::debug!("Refreshing project file structure");
                    project.invalidate_file_structure();
                }
                match project.file_structure() {
                    Some(root) => draw_tree(ctx, &mut self.tree, LAYER, std::slice::from_mut(root), body, true, actions),
                    None => draw_placeholder(body, "No file structure detected..."),
                }
            }
        }

        ctx.leave_layer();
    }
}

impl Default for ProjectExplorer {
    fn default() -> Self {
        Self::new()
    }
}
