//! Per-frame input state and pointer ownership
//!
//! Overlapping surfaces (docked panels, floating editor windows, menus,
//! modal dialogs) register a layer rect as they draw. At the start of the
//! next frame the topmost layer under the mouse owns the pointer, and
//! widgets inside other layers ignore it.

use super::Rect;
use macroquad::prelude::*;

/// Mouse button state
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub right_down: bool,
    pub left_pressed: bool,  // Just pressed this frame
    pub left_released: bool, // Just released this frame
    pub right_pressed: bool,
    pub scroll: f32, // Scroll wheel delta
}

impl MouseState {
    /// Sample the mouse from macroquad
    pub fn capture() -> Self {
        let (x, y) = mouse_position();
        Self {
            x,
            y,
            left_down: is_mouse_button_down(MouseButton::Left),
            right_down: is_mouse_button_down(MouseButton::Right),
            left_pressed: is_mouse_button_pressed(MouseButton::Left),
            left_released: is_mouse_button_released(MouseButton::Left),
            right_pressed: is_mouse_button_pressed(MouseButton::Right),
            scroll: mouse_wheel().1,
        }
    }

    pub fn inside(&self, rect: &Rect) -> bool {
        rect.contains(self.x, self.y)
    }
}

struct Tooltip {
    text: String,
    x: f32,
    y: f32,
}

/// UI context passed through the frame
pub struct UiContext {
    pub mouse: MouseState,
    /// Layer that owns the pointer this frame
    pointer_layer: Option<String>,
    /// Layer widgets are currently being drawn into
    current_layer: Option<String>,
    /// Layers registered this frame, bottom to top
    layers: Vec<(String, Rect)>,
    /// Id of the widget being dragged, if any
    dragging: Option<String>,
    /// A text field had keyboard focus this frame
    text_editing: bool,
    tooltip: Option<Tooltip>,
}

impl UiContext {
    pub fn new() -> Self {
        Self {
            mouse: MouseState::default(),
            pointer_layer: None,
            current_layer: None,
            layers: Vec::new(),
            dragging: None,
            text_editing: false,
            tooltip: None,
        }
    }

    /// Reset at start of frame (call before UI code)
    pub fn begin_frame(&mut self, mouse: MouseState) {
        self.mouse = mouse;
        self.pointer_layer = self
            .layers
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(mouse.x, mouse.y))
            .map(|(id, _)| id.clone());
        self.layers.clear();
        self.current_layer = None;
        self.text_editing = false;
        self.tooltip = None;

        if !self.mouse.left_down {
            self.dragging = None;
        }
        // A drag keeps the pointer in the layer it started in
        if let Some(dragging) = &self.dragging {
            if let Some((layer, _)) = dragging.rsplit_once('#') {
                self.pointer_layer = Some(layer.to_string());
            }
        }
    }

    /// Register a surface for pointer ownership next frame. Later
    /// registrations sit above earlier ones.
    pub fn register_layer(&mut self, id: &str, rect: Rect) {
        self.layers.push((id.to_string(), rect));
    }

    pub fn enter_layer(&mut self, id: &str) {
        self.current_layer = Some(id.to_string());
    }

    pub fn leave_layer(&mut self) {
        self.current_layer = None;
    }

    /// True when the current layer owns the pointer
    pub fn has_pointer(&self) -> bool {
        self.pointer_layer.is_some() && self.pointer_layer == self.current_layer
    }

    /// True when `layer` owns the pointer
    pub fn layer_has_pointer(&self, layer: &str) -> bool {
        self.pointer_layer.as_deref() == Some(layer)
    }

    pub fn pointer_layer_starts_with(&self, prefix: &str) -> bool {
        self.pointer_layer.as_deref().is_some_and(|layer| layer.starts_with(prefix))
    }

    /// True when nothing registered last frame was under the mouse
    pub fn pointer_is_free(&self) -> bool {
        self.pointer_layer.is_none()
    }

    pub fn hovered(&self, rect: &Rect) -> bool {
        self.has_pointer() && self.mouse.inside(rect)
    }

    pub fn clicked(&self, rect: &Rect) -> bool {
        self.mouse.left_pressed && self.hovered(rect)
    }

    pub fn right_clicked(&self, rect: &Rect) -> bool {
        self.mouse.right_pressed && self.hovered(rect)
    }

    /// Scroll delta if the mouse is over `rect` in the owning layer
    pub fn scroll_in(&self, rect: &Rect) -> f32 {
        if self.hovered(rect) {
            self.mouse.scroll
        } else {
            0.0
        }
    }

    /// Start dragging a widget. Ids are scoped to the current layer.
    pub fn start_drag(&mut self, widget: &str) {
        let layer = self.current_layer.as_deref().unwrap_or_default();
        self.dragging = Some(format!("{layer}#{widget}"));
    }

    pub fn is_dragging(&self, widget: &str) -> bool {
        let layer = self.current_layer.as_deref().unwrap_or_default();
        self.dragging.as_deref() == Some(format!("{layer}#{widget}").as_str())
    }

    pub fn set_text_editing(&mut self) {
        self.text_editing = true;
    }

    pub fn text_editing(&self) -> bool {
        self.text_editing
    }

    pub fn set_tooltip(&mut self, text: &str, x: f32, y: f32) {
        self.tooltip = Some(Tooltip { text: text.to_string(), x, y });
    }

    /// Draw the pending tooltip on top of everything (call last)
    pub fn draw_tooltip(&self) {
        let Some(tip) = &self.tooltip else {
            return;
        };
        let dims = measure_text(&tip.text, None, 14, 1.0);
        let w = dims.width + 12.0;
        let h = 22.0;
        let x = (tip.x + 12.0).min(screen_width() - w).max(0.0);
        let y = (tip.y + 18.0).min(screen_height() - h).max(0.0);
        draw_rectangle(x, y, w, h, super::theme::DROPDOWN_BG);
        draw_rectangle_lines(x, y, w, h, 1.0, super::theme::DROPDOWN_BORDER);
        draw_text(&tip.text, x + 6.0, y + 15.0, 14.0, super::theme::TEXT_COLOR);
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new()
    }
}
