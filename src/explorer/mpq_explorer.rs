use super::{draw_placeholder, draw_tree, TreeAction, TreeState};
use crate::archive::Mpq;
use crate::project::{PathEntry, Project};
use crate::ui::{dock_panel, Rect, UiContext};

const LAYER: &str = "mpq-explorer";

/// Browser over the project's auxiliary archives, one root per archive
pub struct MpqExplorer {
    visible: bool,
    tree: TreeState,
    roots: Option<Vec<PathEntry>>,
}

impl MpqExplorer {
    pub fn new() -> Self {
        Self { visible: false, tree: TreeState::default(), roots: None }
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

    /// Drop the cached trees; they are rebuilt from the archives on the
    /// next draw.
    pub fn reset(&mut self) {
        self.roots = None;
        self.tree = TreeState::default();
    }

    pub fn draw(&mut self, ctx: &mut UiContext, rect: Rect, project: Option<&Project>, actions: &mut Vec<TreeAction>) {
        if !self.visible {
            return;
        }

        let (closed, body) = dock_panel(ctx, LAYER, rect, "MPQ Explorer");
        if closed {
            self.visible = false;
        }

        match project {
            None => draw_placeholder(body, "No project loaded..."),
            Some(project) => {
                let roots = self.roots.get_or_insert_with(|| build_roots(project.auxiliary_mpqs()));
                if roots.is_empty() {
                    draw_placeholder(body, "No auxiliary MPQs loaded...");
                } else {
                    draw_tree(ctx, &mut self.tree, LAYER, roots, body, false, actions);
                }
            }
        }

        ctx.leave_layer();
    }
}

impl Default for MpqExplorer {
    fn default() -> Self {
        Self::new()
    }
}

/// One tree per archive, built from its listfile. Archives without a
/// readable listfile show up empty.
pub fn build_roots(mpqs: &[Mpq]) -> Vec<PathEntry> {
    mpqs.iter()
        .map(|mpq| {
            let names = mpq.list_files().unwrap_or_else(|e| {
                log::warn!("Could not list {}: {}", mpq.path().display(), e);
                Vec::new()
            });
            PathEntry::from_mpq_listing(mpq.path(), &names)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::{write_mpq, Storage};
    use tempfile::TempDir;

    #[test]
    fn test_build_roots_from_listfiles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patch_d2.mpq");
        write_mpq(
            &path,
            &[
                ("data\\global\\palette\\act1\\pal.dat", &[0u8; 768][..], Storage::Stored),
                ("data\\local\\font\\latin\\font8.tbl", &b"Woo!"[..], Storage::Zlib),
            ],
        );

        let mpq = Mpq::open(&path).unwrap();
        let roots = build_roots(&[mpq]);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name, "patch_d2.mpq");
        assert!(roots[0].is_root);

        let data = &roots[0].children[0];
        assert_eq!(data.name, "data");
        assert_eq!(data.children.len(), 2);
    }

    #[test]
    fn test_reset_drops_cached_roots() {
        let mut explorer = MpqExplorer::new();
        explorer.roots = Some(Vec::new());
        explorer.reset();
        assert!(explorer.roots.is_none());
    }
}
