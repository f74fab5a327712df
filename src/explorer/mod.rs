//! Docked file browsers
//!
//! Both explorers render a [`PathEntry`] tree: directories toggle open on
//! click, files queue an open request. Children are sorted the first time
//! their parent is expanded.

mod mpq_explorer;
mod project_explorer;

pub use mpq_explorer::MpqExplorer;
pub use project_explorer::ProjectExplorer;

use crate::project::{PathEntry, PathEntrySource};
use crate::ui::theme::*;
use crate::ui::{draw_disclosure, fit_text, Rect, UiContext};
use macroquad::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;

pub const ROW_HEIGHT: f32 = 20.0;
const INDENT: f32 = 14.0;
const CONTEXT_MENU_WIDTH: f32 = 130.0;

/// Requests raised while drawing a tree, applied by the shell afterwards
#[derive(Debug, Clone)]
pub enum TreeAction {
    Open(PathEntry),
    /// Create an empty font table inside this project directory
    NewFontTable(PathBuf),
}

#[derive(Debug, Clone)]
struct ContextMenu {
    directory: PathBuf,
    x: f32,
    y: f32,
}

/// Expansion, scroll and context menu state of one tree view
#[derive(Debug, Default)]
pub struct TreeState {
    /// Nodes whose expansion differs from the default (roots open,
    /// everything else closed)
    toggled: HashSet<String>,
    scroll: f32,
    context_menu: Option<ContextMenu>,
}

impl TreeState {
    pub fn is_expanded(&self, entry: &PathEntry) -> bool {
        entry.is_root ^ self.toggled.contains(&entry.unique_id())
    }

    pub fn toggle(&mut self, entry: &PathEntry) {
        let id = entry.unique_id();
        if !self.toggled.remove(&id) {
            self.toggled.insert(id);
        }
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }
}

/// One visible line of a tree
#[derive(Debug)]
pub struct TreeRow<'a> {
    pub entry: &'a PathEntry,
    pub depth: usize,
    pub expanded: bool,
}

/// Sort the children of every expanded directory
fn sort_expanded(entry: &mut PathEntry, state: &TreeState) {
    if !entry.is_directory || !state.is_expanded(entry) {
        return;
    }
    for child in entry.sorted_children_mut() {
        sort_expanded(child, state);
    }
}

/// Rows in display order, descending only into expanded directories
pub fn flatten<'a>(roots: &'a [PathEntry], state: &TreeState) -> Vec<TreeRow<'a>> {
    fn visit<'a>(entry: &'a PathEntry, depth: usize, state: &TreeState, rows: &mut Vec<TreeRow<'a>>) {
        let expanded = entry.is_directory && state.is_expanded(entry);
        rows.push(TreeRow { entry, depth, expanded });
        if expanded {
            for child in &entry.children {
                visit(child, depth + 1, state, rows);
            }
        }
    }

    let mut rows = Vec::new();
    for root in roots {
        visit(root, 0, state, &mut rows);
    }
    rows
}

/// Draw `roots` into `view` inside the already entered `layer`. With
/// `allow_create`, project directories other than the root get a "New"
/// context menu.
pub fn draw_tree(
    ctx: &mut UiContext,
    state: &mut TreeState,
    layer: &str,
    roots: &mut [PathEntry],
    view: Rect,
    allow_create: bool,
    actions: &mut Vec<TreeAction>,
) {
    for root in roots.iter_mut() {
        sort_expanded(root, state);
    }
    let menu_was_open = state.context_menu.is_some();
    let rows = flatten(roots, state);

    let content_height = rows.len() as f32 * ROW_HEIGHT;
    let delta = ctx.scroll_in(&view);
    if delta != 0.0 {
        state.scroll -= delta.signum() * ROW_HEIGHT * 3.0;
    }
    state.scroll = state.scroll.clamp(0.0, (content_height - view.h).max(0.0));

    let mut toggle = None;
    let first = (state.scroll / ROW_HEIGHT) as usize;
    let mut y = view.y + first as f32 * ROW_HEIGHT - state.scroll;
    for (index, row) in rows.iter().enumerate().skip(first) {
        if y + ROW_HEIGHT > view.bottom() {
            break;
        }
        let rect = Rect::new(view.x, y, view.w, ROW_HEIGHT);
        y += ROW_HEIGHT;

        let background = if ctx.hovered(&rect) {
            ROW_HOVER
        } else if index % 2 == 0 {
            ROW_EVEN
        } else {
            ROW_ODD
        };
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, background);

        let indent = rect.x + 6.0 + row.depth as f32 * INDENT;
        let text_x = indent + 12.0;
        let entry = row.entry;
        if entry.is_directory {
            draw_disclosure(indent, rect.center_y(), row.expanded, TEXT_DIM);
        }
        let color = if entry.is_directory { TEXT_COLOR } else { Color::new(0.7, 0.72, 0.78, 1.0) };
        let name = fit_text(&entry.name, rect.right() - text_x - 4.0, FONT_SIZE_CONTENT);
        draw_text(&name, text_x, rect.y + 14.0, FONT_SIZE_CONTENT, color);

        if ctx.clicked(&rect) {
            if entry.is_directory {
                toggle = Some(entry.clone());
            } else {
                actions.push(TreeAction::Open(entry.clone()));
            }
        }
        let creatable = allow_create && entry.is_directory && !entry.is_root && entry.source == PathEntrySource::Project;
        if creatable && ctx.right_clicked(&rect) {
            state.context_menu = Some(ContextMenu {
                directory: PathBuf::from(&entry.full_path),
                x: ctx.mouse.x,
                y: ctx.mouse.y,
            });
        }
    }

    if let Some(entry) = toggle {
        state.toggle(&entry);
    }

    draw_context_menu(ctx, state, layer, menu_was_open, actions);
}

fn draw_context_menu(
    ctx: &mut UiContext,
    state: &mut TreeState,
    layer: &str,
    dismissable: bool,
    actions: &mut Vec<TreeAction>,
) {
    let Some(menu) = state.context_menu.clone() else {
        return;
    };

    let menu_layer = format!("{layer}:context");
    let new_row = Rect::new(menu.x, menu.y, CONTEXT_MENU_WIDTH, ROW_HEIGHT + 4.0);
    let submenu_row = Rect::new(new_row.right(), new_row.y, CONTEXT_MENU_WIDTH, ROW_HEIGHT + 4.0);

    ctx.enter_layer(&menu_layer);
    ctx.register_layer(&menu_layer, new_row);
    ctx.register_layer(&menu_layer, submenu_row);

    for rect in [new_row, submenu_row] {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, DROPDOWN_BG);
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, DROPDOWN_BORDER);
    }
    draw_text("New", new_row.x + 8.0, new_row.y + 16.0, FONT_SIZE_CONTENT, TEXT_COLOR);
    draw_disclosure(new_row.right() - 14.0, new_row.center_y(), false, TEXT_COLOR);

    if ctx.hovered(&submenu_row) {
        draw_rectangle(submenu_row.x + 1.0, submenu_row.y + 1.0, submenu_row.w - 2.0, submenu_row.h - 2.0, DROPDOWN_HOVER);
    }
    draw_text("Font Table", submenu_row.x + 8.0, submenu_row.y + 16.0, FONT_SIZE_CONTENT, TEXT_COLOR);

    if ctx.clicked(&submenu_row) {
        actions.push(TreeAction::NewFontTable(menu.directory));
        state.close_context_menu();
    } else if dismissable && (ctx.mouse.left_pressed || ctx.mouse.right_pressed) && !ctx.has_pointer() {
        state.close_context_menu();
    }
    ctx.enter_layer(layer);
}

/// Draw a dimmed one-line message at the top of `view`
fn draw_placeholder(view: Rect, text: &str) {
    draw_text(text, view.x + 8.0, view.y + 18.0, FONT_SIZE_CONTENT, TEXT_DIM);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn listing(names: &[&str]) -> PathEntry {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        PathEntry::from_mpq_listing(Path::new("/d2/d2data.mpq"), &names)
    }

    fn names(rows: &[TreeRow<'_>]) -> Vec<(String, usize)> {
        rows.iter().map(|r| (r.entry.name.clone(), r.depth)).collect()
    }

    #[test]
    fn test_root_expanded_by_default() {
        let mut roots = vec![listing(&["data\\global\\palette.dat", "readme.txt"])];
        let state = TreeState::default();
        sort_expanded(&mut roots[0], &state);

        let rows = flatten(&roots, &state);
        assert_eq!(
            names(&rows),
            vec![("d2data.mpq".to_string(), 0), ("data".to_string(), 1), ("readme.txt".to_string(), 1)]
        );
        assert!(rows[0].expanded);
        assert!(!rows[1].expanded);
    }

    #[test]
    fn test_toggle_expands_and_collapses() {
        let mut roots = vec![listing(&["data\\b.txt", "data\\A.txt"])];
        let mut state = TreeState::default();
        let data = roots[0].children[0].clone();

        state.toggle(&data);
        sort_expanded(&mut roots[0], &state);
        assert_eq!(
            names(&flatten(&roots, &state))[2..],
            [("A.txt".to_string(), 2), ("b.txt".to_string(), 2)]
        );

        let root = roots[0].clone();
        state.toggle(&root);
        assert_eq!(flatten(&roots, &state).len(), 1);
    }

    #[test]
    fn test_multiple_roots_follow_each_other() {
        let roots = vec![
            listing(&["a.txt"]),
            PathEntry::from_mpq_listing(Path::new("/d2/d2exp.mpq"), &["b.txt".to_string()]),
        ];
        let rows = flatten(&roots, &TreeState::default());
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].entry.name, "d2exp.mpq");
    }
}
