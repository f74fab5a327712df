//! Main menu bar with dropdowns and one level of submenus

use super::theme::*;
use super::{Rect, UiContext};
use macroquad::prelude::*;

pub const MENU_BAR_HEIGHT: f32 = 24.0;
const MENU_LAYER: &str = "menubar";
const ITEM_HEIGHT: f32 = 22.0;
const SEPARATOR_HEIGHT: f32 = 8.0;
const MIN_DROPDOWN_WIDTH: f32 = 180.0;

pub enum MenuItem<A> {
    Action {
        label: String,
        shortcut: Option<String>,
        action: A,
        enabled: bool,
        checked: Option<bool>,
    },
    Submenu {
        label: String,
        items: Vec<MenuItem<A>>,
    },
    Separator,
}

impl<A> MenuItem<A> {
    pub fn action(label: impl Into<String>, action: A) -> Self {
        MenuItem::Action {
            label: label.into(),
            shortcut: None,
            action,
            enabled: true,
            checked: None,
        }
    }

    pub fn submenu(label: impl Into<String>, items: Vec<MenuItem<A>>) -> Self {
        MenuItem::Submenu { label: label.into(), items }
    }

    pub fn with_shortcut(mut self, text: Option<String>) -> Self {
        if let MenuItem::Action { shortcut, .. } = &mut self {
            *shortcut = text;
        }
        self
    }

    pub fn enabled(mut self, value: bool) -> Self {
        if let MenuItem::Action { enabled, .. } = &mut self {
            *enabled = value;
        }
        self
    }

    pub fn checked(mut self, value: bool) -> Self {
        if let MenuItem::Action { checked, .. } = &mut self {
            *checked = Some(value);
        }
        self
    }

    fn height(&self) -> f32 {
        match self {
            MenuItem::Separator => SEPARATOR_HEIGHT,
            _ => ITEM_HEIGHT,
        }
    }
}

pub struct Menu<A> {
    pub title: String,
    pub items: Vec<MenuItem<A>>,
}

impl<A> Menu<A> {
    pub fn new(title: impl Into<String>, items: Vec<MenuItem<A>>) -> Self {
        Self { title: title.into(), items }
    }
}

#[derive(Debug, Default)]
pub struct MenuBarState {
    open: Option<usize>,
    open_submenu: Option<usize>,
}

impl MenuBarState {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn close(&mut self) {
        self.open = None;
        self.open_submenu = None;
    }
}

/// Draw the menu bar across `rect` with `status` right-aligned. Returns
/// the action of a clicked item.
pub fn draw_menu_bar<A: Clone>(
    ctx: &mut UiContext,
    state: &mut MenuBarState,
    rect: Rect,
    menus: &[Menu<A>],
    status: &str,
) -> Option<A> {
    ctx.enter_layer(MENU_LAYER);
    ctx.register_layer(MENU_LAYER, rect);
    let clicked_in_menus = ctx.mouse.left_pressed && ctx.has_pointer();

    draw_rectangle(rect.x, rect.y, rect.w, rect.h, HEADER_COLOR);
    draw_line(rect.x, rect.bottom(), rect.right(), rect.bottom(), 1.0, BORDER_COLOR);

    if state.open.is_some_and(|open| open >= menus.len()) {
        state.close();
    }

    let mut x = rect.x + 4.0;
    let mut title_rects = Vec::with_capacity(menus.len());
    for (index, menu) in menus.iter().enumerate() {
        let width = measure_text(&menu.title, None, FONT_SIZE_CONTENT as u16, 1.0).width + 16.0;
        let title_rect = Rect::new(x, rect.y, width, rect.h);
        x += width;

        let hovered = ctx.hovered(&title_rect);
        if ctx.clicked(&title_rect) {
            if state.open == Some(index) {
                state.close();
            } else {
                state.open = Some(index);
                state.open_submenu = None;
            }
        } else if hovered && state.open.is_some() && state.open != Some(index) {
            state.open = Some(index);
            state.open_submenu = None;
        }

        if state.open == Some(index) {
            draw_rectangle(title_rect.x, title_rect.y, title_rect.w, title_rect.h, DROPDOWN_HOVER);
        } else if hovered {
            draw_rectangle(title_rect.x, title_rect.y, title_rect.w, title_rect.h, DROPDOWN_BG);
        }
        draw_text(&menu.title, title_rect.x + 8.0, rect.y + 16.0, FONT_SIZE_CONTENT, TEXT_COLOR);
        title_rects.push(title_rect);
    }

    let status_width = measure_text(status, None, FONT_SIZE_CONTENT as u16, 1.0).width;
    draw_text(status, rect.right() - status_width - 10.0, rect.y + 16.0, FONT_SIZE_CONTENT, TEXT_DIM);

    let mut result = None;
    if let Some(open) = state.open {
        let anchor = title_rects[open];
        let (action, submenu) = draw_dropdown(
            ctx,
            anchor.x,
            anchor.bottom(),
            &menus[open].items,
            state.open_submenu,
        );
        state.open_submenu = submenu;
        if action.is_some() {
            result = action;
            state.close();
        }
    }

    if ctx.mouse.left_pressed && !clicked_in_menus && state.is_open() {
        state.close();
    }

    ctx.leave_layer();
    result
}

fn dropdown_width(items: &[MenuItem<impl Clone>]) -> f32 {
    items
        .iter()
        .map(|item| match item {
            MenuItem::Action { label, shortcut, .. } => {
                let shortcut_width = shortcut
                    .as_deref()
                    .map(|s| measure_text(s, None, FONT_SIZE_SMALL as u16, 1.0).width + 24.0)
                    .unwrap_or(0.0);
                measure_text(label, None, FONT_SIZE_CONTENT as u16, 1.0).width + shortcut_width + 40.0
            }
            MenuItem::Submenu { label, .. } => {
                measure_text(label, None, FONT_SIZE_CONTENT as u16, 1.0).width + 56.0
            }
            MenuItem::Separator => 0.0,
        })
        .fold(MIN_DROPDOWN_WIDTH, f32::max)
}

/// Returns (clicked action, hovered submenu index)
fn draw_dropdown<A: Clone>(
    ctx: &mut UiContext,
    x: f32,
    y: f32,
    items: &[MenuItem<A>],
    open_submenu: Option<usize>,
) -> (Option<A>, Option<usize>) {
    let width = dropdown_width(items);
    let height: f32 = items.iter().map(MenuItem::height).sum::<f32>() + 4.0;
    let x = x.min(screen_width() - width).max(0.0);
    let panel = Rect::new(x, y, width, height);
    ctx.register_layer(MENU_LAYER, panel);

    draw_rectangle(panel.x, panel.y, panel.w, panel.h, DROPDOWN_BG);
    draw_rectangle_lines(panel.x, panel.y, panel.w, panel.h, 1.0, DROPDOWN_BORDER);

    let mut action = None;
    let mut submenu = open_submenu;
    let mut submenu_anchor = None;
    let mut item_y = y + 2.0;

    for (index, item) in items.iter().enumerate() {
        let row = Rect::new(x + 2.0, item_y, width - 4.0, item.height());
        item_y += item.height();

        match item {
            MenuItem::Separator => {
                draw_line(row.x + 6.0, row.center_y(), row.right() - 6.0, row.center_y(), 1.0, DROPDOWN_BORDER);
            }
            MenuItem::Action { label, shortcut, action: item_action, enabled, checked } => {
                let hovered = *enabled && ctx.hovered(&row);
                if hovered {
                    draw_rectangle(row.x, row.y, row.w, row.h, DROPDOWN_HOVER);
                    submenu = None;
                }
                let color = if *enabled { TEXT_COLOR } else { TEXT_DIM };
                if checked == &Some(true) {
                    draw_rectangle(row.x + 7.0, row.center_y() - 3.0, 6.0, 6.0, ACCENT_COLOR);
                }
                draw_text(label, row.x + 20.0, row.y + 15.0, FONT_SIZE_CONTENT, color);
                if let Some(shortcut) = shortcut {
                    let w = measure_text(shortcut, None, FONT_SIZE_SMALL as u16, 1.0).width;
                    draw_text(shortcut, row.right() - w - 8.0, row.y + 15.0, FONT_SIZE_SMALL, TEXT_DIM);
                }
                if hovered && ctx.mouse.left_pressed {
                    action = Some(item_action.clone());
                }
            }
            MenuItem::Submenu { label, .. } => {
                if ctx.hovered(&row) {
                    submenu = Some(index);
                }
                if submenu == Some(index) {
                    draw_rectangle(row.x, row.y, row.w, row.h, DROPDOWN_HOVER);
                    submenu_anchor = Some(row);
                }
                draw_text(label, row.x + 20.0, row.y + 15.0, FONT_SIZE_CONTENT, TEXT_COLOR);
                super::draw_disclosure(row.right() - 14.0, row.center_y(), false, TEXT_COLOR);
            }
        }
    }

    if let (Some(index), Some(anchor)) = (submenu, submenu_anchor) {
        if let Some(MenuItem::Submenu { items, .. }) = items.get(index) {
            let (sub_action, _) = draw_dropdown(ctx, anchor.right(), anchor.y - 2.0, items, None);
            if sub_action.is_some() {
                action = sub_action;
            }
        }
    }

    (action, submenu)
}
