use crate::config::{ViewerConfig, RIGHT_BUTTON_MASK};
use crate::look::{LookState, LOOK_SPEED};
use crate::touch::{TouchPoint, TouchTracker};

/// Mouse and touch drag state for inline sessions.
///
/// Fed by the canvas event listeners and read once per inline frame to
/// derive the adjusted reference space.
#[derive(Debug, Clone)]
pub struct InlineViewInput {
    look: LookState,
    touch: TouchTracker,
    look_speed: f64,
    drag_button_mask: u16,
}

impl InlineViewInput {
    pub fn new() -> Self {
        Self {
            look: LookState::new(),
            touch: TouchTracker::new(),
            look_speed: LOOK_SPEED,
            drag_button_mask: RIGHT_BUTTON_MASK,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            look_speed: config.look_speed,
            drag_button_mask: config.drag_button_mask,
            ..Self::new()
        }
    }

    pub fn look(&self) -> &LookState {
        &self.look
    }

    pub fn touch(&self) -> &TouchTracker {
        &self.touch
    }

    /// Whether `buttons` (a `MouseEvent.buttons` value) holds a drag button.
    ///
    /// This is a bitmask test: a left-only drag (`buttons == 1`) does not
    /// rotate the view.
    pub fn is_drag_button_held(&self, buttons: u16) -> bool {
        buttons & self.drag_button_mask != 0
    }

    /// Returns `true` if the movement rotated the view.
    pub fn on_mouse_move(&mut self, buttons: u16, movement_x: f64, movement_y: f64) -> bool {
        if !self.is_drag_button_held(buttons) {
            return false;
        }
        self.rotate(movement_x, movement_y);
        true
    }

    pub fn on_touch_start(&mut self, changed: &[TouchPoint]) {
        if self.touch.start(changed) {
            log::trace!("primary touch {:?}", self.touch.primary_identifier());
        }
    }

    pub fn on_touch_move(&mut self, changed: &[TouchPoint]) {
        if let Some((dx, dy)) = self.touch.moved(changed) {
            self.rotate(dx, dy);
        }
    }

    pub fn on_touch_end(&mut self, changed: &[TouchPoint]) {
        if let Some((dx, dy)) = self.touch.end(changed) {
            self.rotate(dx, dy);
        }
    }

    pub fn on_touch_cancel(&mut self, changed: &[TouchPoint]) {
        self.touch.cancel(changed);
    }

    fn rotate(&mut self, dx: f64, dy: f64) {
        self.look.rotate_view_scaled(dx, dy, self.look_speed);
    }
}

impl Default for InlineViewInput {
    fn default() -> Self {
        Self::new()
    }
}
